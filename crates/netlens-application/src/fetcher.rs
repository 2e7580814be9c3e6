//! Paginated resource fetcher.
//!
//! Executes `load(resource, params)` against one paginated collection and
//! publishes a [`FetchResult`] through a `watch` channel. Failures never
//! escape `load`; they become the result's `error`.

use async_trait::async_trait;
use netlens_core::Result;
use netlens_core::anomaly::Anomaly;
use netlens_core::api::CaptureApi;
use netlens_core::packet::Packet;
use netlens_core::query::{FetchResult, Page, QueryParams, ResourceKey, ResourceKind};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

use crate::sequence::RequestSequence;

/// A paginated collection of a capture session.
#[async_trait]
pub trait PagedResource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    fn kind(&self) -> ResourceKind;

    async fn fetch_page(
        &self,
        api: &dyn CaptureApi,
        key: &ResourceKey,
        params: &QueryParams,
    ) -> Result<Page<Self::Item>>;
}

/// `GET /database/sessions/{id}/packets`
#[derive(Debug, Clone, Copy, Default)]
pub struct PacketResource;

#[async_trait]
impl PagedResource for PacketResource {
    type Item = Packet;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Packets
    }

    async fn fetch_page(
        &self,
        api: &dyn CaptureApi,
        key: &ResourceKey,
        params: &QueryParams,
    ) -> Result<Page<Packet>> {
        let page = api.session_packets(key, params).await?;
        Ok(Page {
            items: page.packets,
            total: page.total,
        })
    }
}

/// `GET /database/sessions/{id}/anomalies`
#[derive(Debug, Clone, Copy, Default)]
pub struct AnomalyResource;

#[async_trait]
impl PagedResource for AnomalyResource {
    type Item = Anomaly;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Anomalies
    }

    async fn fetch_page(
        &self,
        api: &dyn CaptureApi,
        key: &ResourceKey,
        params: &QueryParams,
    ) -> Result<Page<Anomaly>> {
        let page = api.session_anomalies(key, params).await?;
        Ok(Page {
            items: page.anomalies,
            total: page.total,
        })
    }
}

struct FetchSite {
    sequence: RequestSequence,
    key: Option<ResourceKey>,
}

pub struct PaginatedResourceFetcher<R: PagedResource> {
    api: Arc<dyn CaptureApi>,
    resource: R,
    site: Mutex<FetchSite>,
    result: watch::Sender<FetchResult<R::Item>>,
}

impl<R: PagedResource> PaginatedResourceFetcher<R> {
    pub fn new(api: Arc<dyn CaptureApi>, resource: R) -> Self {
        let (result, _) = watch::channel(FetchResult::default());
        Self {
            api,
            resource,
            site: Mutex::new(FetchSite {
                sequence: RequestSequence::default(),
                key: None,
            }),
            result,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.resource.kind()
    }

    /// Current state.
    pub fn result(&self) -> FetchResult<R::Item> {
        self.result.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<FetchResult<R::Item>> {
        self.result.subscribe()
    }

    /// Loads one page of `key`.
    ///
    /// With no key the fetcher goes idle: the result is emptied and any
    /// request still in flight is discarded when it resolves. Switching to a
    /// different key also discards in-flight requests for the old one.
    /// Returns whether this call's response was applied.
    pub async fn load(&self, key: Option<ResourceKey>, params: QueryParams) -> bool {
        match self.start(key).await {
            Some(ticket) => self.complete(ticket, params).await,
            None => false,
        }
    }

    /// Tags a request and marks the result loading. Callers that must order
    /// requests against their own state do this while holding that state.
    pub(crate) async fn start(&self, key: Option<ResourceKey>) -> Option<FetchTicket> {
        let mut site = self.site.lock().await;
        if site.key != key {
            site.sequence.invalidate();
            site.key = key.clone();
        }
        let Some(key) = key else {
            site.sequence.invalidate();
            self.result.send_modify(FetchResult::clear);
            tracing::debug!(kind = %self.resource.kind(), "No session selected, fetcher idle");
            return None;
        };
        let seq = site.sequence.issue();
        self.result.send_modify(FetchResult::begin);
        Some(FetchTicket { key, seq })
    }

    /// Performs the request of `ticket` and applies the response unless a
    /// newer one was applied first.
    pub(crate) async fn complete(&self, ticket: FetchTicket, params: QueryParams) -> bool {
        let kind = self.resource.kind();
        let FetchTicket { key, seq } = ticket;

        tracing::debug!(%kind, %key, seq, limit = params.limit, offset = params.offset, "Fetching page");
        let outcome = self
            .resource
            .fetch_page(self.api.as_ref(), &key, &params)
            .await;

        let mut site = self.site.lock().await;
        if site.key.as_ref() != Some(&key) || !site.sequence.accept(seq) {
            tracing::warn!(%kind, %key, seq, "Discarding stale response");
            return false;
        }
        let still_loading = site.sequence.has_newer(seq);
        self.result.send_modify(|result| {
            match outcome {
                Ok(page) => {
                    tracing::debug!(%kind, seq, items = page.items.len(), total = page.total, "Page loaded");
                    result.succeed(page);
                }
                Err(err) => {
                    tracing::warn!(%kind, %key, error = %err, "Page load failed");
                    result.fail(kind.failure_message());
                }
            }
            result.loading = still_loading;
        });
        true
    }
}

/// A tagged request, issued by [`PaginatedResourceFetcher::start`].
#[derive(Debug)]
pub(crate) struct FetchTicket {
    key: ResourceKey,
    seq: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{GatedApi, MockCaptureApi, packet, packet_page};
    use netlens_core::NetlensError;
    use netlens_core::query::{FilterSet, PageState};

    fn params(page: u64) -> QueryParams {
        let mut state = PageState::new(10);
        state.go_to(page, 1000);
        QueryParams::new(&state, &FilterSet::new())
    }

    fn key(session: &str) -> Option<ResourceKey> {
        Some(ResourceKey::new(None, session))
    }

    #[tokio::test]
    async fn test_success_populates_result() {
        let api = Arc::new(MockCaptureApi::new());
        api.push_packets(Ok(packet_page(&[1, 2], 42)));
        let fetcher = PaginatedResourceFetcher::new(api.clone(), PacketResource);

        assert!(fetcher.load(key("1"), params(0)).await);

        let result = fetcher.result();
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.total, 42);
        assert!(!result.loading);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_failure_sets_localized_error() {
        let api = Arc::new(MockCaptureApi::new());
        api.push_packets(Ok(packet_page(&[1], 1)));
        api.push_packets(Err(NetlensError::network(Some(500), "boom")));
        let fetcher = PaginatedResourceFetcher::new(api.clone(), PacketResource);

        fetcher.load(key("1"), params(0)).await;
        fetcher.load(key("1"), params(0)).await;

        let result = fetcher.result();
        assert!(result.items.is_empty());
        assert_eq!(result.total, 0);
        assert_eq!(result.error.as_deref(), Some("Error al cargar los paquetes."));
        assert!(!result.loading);
    }

    #[tokio::test]
    async fn test_no_key_is_idle() {
        let api = Arc::new(MockCaptureApi::new());
        let fetcher = PaginatedResourceFetcher::new(api.clone(), AnomalyResource);

        assert!(!fetcher.load(None, params(0)).await);

        assert_eq!(fetcher.result(), FetchResult::default());
        assert_eq!(api.anomaly_calls().len(), 0);
    }

    #[tokio::test]
    async fn test_newer_response_wins_when_older_resolves_last() {
        let api = Arc::new(GatedApi::new());
        let fetcher = Arc::new(PaginatedResourceFetcher::new(
            api.clone() as Arc<dyn CaptureApi>,
            PacketResource,
        ));

        let a = tokio::spawn({
            let fetcher = fetcher.clone();
            async move { fetcher.load(key("1"), params(0)).await }
        });
        api.wait_for_calls(1).await;
        let b = tokio::spawn({
            let fetcher = fetcher.clone();
            async move { fetcher.load(key("1"), params(1)).await }
        });
        api.wait_for_calls(2).await;

        // B resolves first, then A.
        api.release(1, Ok(packet_page(&[20], 30)));
        assert!(b.await.unwrap());
        api.release(0, Ok(packet_page(&[10], 30)));
        assert!(!a.await.unwrap());

        let result = fetcher.result();
        assert_eq!(result.items, vec![packet(20)]);
        assert!(!result.loading);
    }

    #[tokio::test]
    async fn test_older_response_in_order_keeps_loading() {
        let api = Arc::new(GatedApi::new());
        let fetcher = Arc::new(PaginatedResourceFetcher::new(
            api.clone() as Arc<dyn CaptureApi>,
            PacketResource,
        ));

        let a = tokio::spawn({
            let fetcher = fetcher.clone();
            async move { fetcher.load(key("1"), params(0)).await }
        });
        api.wait_for_calls(1).await;
        let b = tokio::spawn({
            let fetcher = fetcher.clone();
            async move { fetcher.load(key("1"), params(1)).await }
        });
        api.wait_for_calls(2).await;

        api.release(0, Ok(packet_page(&[10], 30)));
        assert!(a.await.unwrap());
        assert!(fetcher.result().loading);

        api.release(1, Ok(packet_page(&[20], 30)));
        assert!(b.await.unwrap());
        let result = fetcher.result();
        assert_eq!(result.items, vec![packet(20)]);
        assert!(!result.loading);
    }

    #[tokio::test]
    async fn test_switching_session_discards_old_response() {
        let api = Arc::new(GatedApi::new());
        let fetcher = Arc::new(PaginatedResourceFetcher::new(
            api.clone() as Arc<dyn CaptureApi>,
            PacketResource,
        ));

        let old = tokio::spawn({
            let fetcher = fetcher.clone();
            async move { fetcher.load(key("old"), params(0)).await }
        });
        api.wait_for_calls(1).await;
        let new = tokio::spawn({
            let fetcher = fetcher.clone();
            async move { fetcher.load(key("new"), params(0)).await }
        });
        api.wait_for_calls(2).await;

        // The old session's response arrives first but must not be shown.
        api.release(0, Ok(packet_page(&[1], 1)));
        assert!(!old.await.unwrap());
        assert!(fetcher.result().items.is_empty());

        api.release(1, Ok(packet_page(&[2], 1)));
        assert!(new.await.unwrap());
        assert_eq!(fetcher.result().items, vec![packet(2)]);
    }
}
