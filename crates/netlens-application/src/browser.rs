//! ResourceBrowser - filters, pagination and fetching for one table view.
//!
//! The browser owns the authoritative view state of a packet or anomaly
//! table (bound session, [`PageState`], committed [`FilterSet`]) and turns
//! every change of it into a fetch. View updates and request tagging happen
//! under one lock, so the response that ends up displayed always belongs to
//! the latest view state.

use netlens_core::api::CaptureApi;
use netlens_core::query::{
    FetchResult, FilterSet, PageState, QueryParams, ResourceKey, ResourceKind,
};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use crate::fetcher::{FetchTicket, PagedResource, PaginatedResourceFetcher};

struct BrowseView {
    key: Option<ResourceKey>,
    page: PageState,
    filters: FilterSet,
}

pub struct ResourceBrowser<R: PagedResource> {
    fetcher: PaginatedResourceFetcher<R>,
    view: Mutex<BrowseView>,
}

pub(crate) type Staged = (FetchTicket, QueryParams);

impl<R: PagedResource> ResourceBrowser<R> {
    /// Creates an unbound browser using the resource's default page size.
    pub fn new(api: Arc<dyn CaptureApi>, resource: R) -> Self {
        let limit = resource.kind().default_limit();
        Self::with_limit(api, resource, limit)
    }

    pub fn with_limit(api: Arc<dyn CaptureApi>, resource: R, limit: u32) -> Self {
        Self {
            fetcher: PaginatedResourceFetcher::new(api, resource),
            view: Mutex::new(BrowseView {
                key: None,
                page: PageState::new(limit),
                filters: FilterSet::new(),
            }),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.fetcher.kind()
    }

    pub fn result(&self) -> FetchResult<R::Item> {
        self.fetcher.result()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchResult<R::Item>> {
        self.fetcher.subscribe()
    }

    pub async fn page_state(&self) -> PageState {
        self.view.lock().await.page
    }

    pub async fn filters(&self) -> FilterSet {
        self.view.lock().await.filters.clone()
    }

    pub async fn resource_key(&self) -> Option<ResourceKey> {
        self.view.lock().await.key.clone()
    }

    pub async fn total_pages(&self) -> u64 {
        let total = self.fetcher.result().total;
        self.view.lock().await.page.total_pages(total)
    }

    pub async fn can_next(&self) -> bool {
        let total = self.fetcher.result().total;
        self.view.lock().await.page.can_next(total)
    }

    pub async fn can_previous(&self) -> bool {
        let total = self.fetcher.result().total;
        self.view.lock().await.page.can_previous(total)
    }

    /// Binds the browser to another session (or to none). A new session
    /// starts on the first page; an unchanged key does nothing.
    pub async fn set_resource(&self, key: Option<ResourceKey>) -> bool {
        match self.stage_resource(key).await {
            Some(staged) => {
                self.run(staged).await;
                true
            }
            None => false,
        }
    }

    /// Replaces the committed filters and returns to the first page. A
    /// value-equal set is a no-op.
    pub async fn apply_filters(&self, filters: FilterSet) -> bool {
        match self.stage_filters(filters).await {
            Some(staged) => {
                self.run(staged).await;
                true
            }
            None => false,
        }
    }

    pub async fn set_limit(&self, limit: u32) {
        let staged = {
            let mut view = self.view.lock().await;
            view.page.set_limit(limit);
            self.stage(&view).await
        };
        self.run(staged).await;
    }

    /// Moves one page forward. Does nothing on the last page.
    pub async fn next_page(&self) -> bool {
        self.navigate(PageState::next_page).await
    }

    /// Moves one page back. Does nothing on the first page.
    pub async fn previous_page(&self) -> bool {
        self.navigate(PageState::previous_page).await
    }

    /// Jumps to `page` (0-based), clamped to the last known page.
    pub async fn go_to_page(&self, page: u64) {
        let total = self.fetcher.result().total;
        let staged = {
            let mut view = self.view.lock().await;
            view.page.go_to(page, total);
            self.stage(&view).await
        };
        self.run(staged).await;
    }

    /// Refetches the current page with the current filters.
    pub async fn refresh(&self) {
        let staged = {
            let view = self.view.lock().await;
            self.stage(&view).await
        };
        self.run(staged).await;
    }

    /// Applies every filter set committed on `committed` until the sender
    /// goes away.
    pub fn follow_filters(self: &Arc<Self>, mut committed: watch::Receiver<FilterSet>) -> JoinHandle<()> {
        let browser = Arc::clone(self);
        tokio::spawn(async move {
            while committed.changed().await.is_ok() {
                let filters = committed.borrow_and_update().clone();
                // Stage inline so commits are tagged in order; only the
                // request itself runs detached.
                if let Some(staged) = browser.stage_filters(filters).await {
                    let browser = Arc::clone(&browser);
                    tokio::spawn(async move { browser.run(staged).await });
                }
            }
            tracing::debug!(kind = %browser.kind(), "Filter source closed");
        })
    }

    async fn navigate(&self, step: fn(&mut PageState, u64) -> bool) -> bool {
        let total = self.fetcher.result().total;
        let staged = {
            let mut view = self.view.lock().await;
            if !step(&mut view.page, total) {
                return false;
            }
            self.stage(&view).await
        };
        self.run(staged).await;
        true
    }

    /// Rebinds the view and tags the first request for the new key without
    /// sending it. Outer `None` means the key did not change.
    pub(crate) async fn stage_resource(&self, key: Option<ResourceKey>) -> Option<Option<Staged>> {
        let mut view = self.view.lock().await;
        if view.key == key {
            return None;
        }
        view.key = key;
        view.page.reset();
        Some(self.stage(&view).await)
    }

    async fn stage_filters(&self, filters: FilterSet) -> Option<Option<Staged>> {
        let mut view = self.view.lock().await;
        if view.filters == filters {
            return None;
        }
        tracing::debug!(kind = %self.kind(), ?filters, "Applying filters");
        view.filters = filters;
        view.page.reset();
        Some(self.stage(&view).await)
    }

    async fn stage(&self, view: &BrowseView) -> Option<Staged> {
        let params = QueryParams::new(&view.page, &view.filters);
        let ticket = self.fetcher.start(view.key.clone()).await?;
        Some((ticket, params))
    }

    pub(crate) async fn run(&self, staged: Option<Staged>) {
        if let Some((ticket, params)) = staged {
            self.fetcher.complete(ticket, params).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::{DEFAULT_DEBOUNCE, FilterDebouncer};
    use crate::fetcher::{AnomalyResource, PacketResource};
    use crate::test_support::{MockCaptureApi, anomaly, packet_page};
    use netlens_core::anomaly::AnomalyPage;
    use std::time::Duration;

    fn key(session: &str) -> Option<ResourceKey> {
        Some(ResourceKey::new(Some("database_1.db".to_string()), session))
    }

    #[tokio::test]
    async fn test_unbound_browser_does_not_fetch() {
        let api = Arc::new(MockCaptureApi::new());
        let browser = ResourceBrowser::new(api.clone(), PacketResource);

        browser.refresh().await;
        assert!(!browser.next_page().await);

        assert!(api.packet_calls().is_empty());
        assert!(browser.result().is_idle());
    }

    #[tokio::test]
    async fn test_filters_reset_page_and_offset() {
        let api = Arc::new(MockCaptureApi::new());
        api.push_packets(Ok(packet_page(&[1], 100)));
        let browser = ResourceBrowser::new(api.clone(), PacketResource);

        browser.set_resource(key("7")).await;
        browser.go_to_page(3).await;
        assert_eq!(browser.page_state().await.offset(), 60);

        assert!(browser.apply_filters(FilterSet::new().with("protocol", "TCP")).await);

        let (called_key, params) = api.packet_calls().last().cloned().unwrap();
        assert_eq!(called_key, key("7").unwrap());
        assert_eq!(params.offset, 0);
        assert_eq!(params.limit, 20);
        assert_eq!(params.filters.get("protocol"), Some("TCP"));
        assert_eq!(browser.page_state().await.current_page(), 0);
    }

    #[tokio::test]
    async fn test_equal_filters_do_not_refetch() {
        let api = Arc::new(MockCaptureApi::new());
        let browser = ResourceBrowser::new(api.clone(), AnomalyResource);
        browser.set_resource(key("1")).await;
        browser
            .apply_filters(FilterSet::new().with("severity", "high"))
            .await;
        let calls = api.anomaly_calls().len();

        assert!(
            !browser
                .apply_filters(FilterSet::new().with("severity", "high"))
                .await
        );
        assert_eq!(api.anomaly_calls().len(), calls);
    }

    #[tokio::test]
    async fn test_pagination_stops_at_bounds() {
        let api = Arc::new(MockCaptureApi::new());
        api.push_anomalies(Ok(AnomalyPage {
            anomalies: vec![anomaly(1)],
            total: 25,
        }));
        api.push_anomalies(Ok(AnomalyPage {
            anomalies: vec![anomaly(11)],
            total: 25,
        }));
        api.push_anomalies(Ok(AnomalyPage {
            anomalies: vec![anomaly(21)],
            total: 25,
        }));
        let browser = ResourceBrowser::new(api.clone(), AnomalyResource);
        browser.set_resource(key("1")).await;

        assert!(!browser.can_previous().await);
        assert!(!browser.previous_page().await);
        assert!(browser.next_page().await);
        assert!(browser.next_page().await);
        assert!(!browser.can_next().await);
        assert!(!browser.next_page().await);

        let offsets: Vec<u64> = api.anomaly_calls().iter().map(|(_, p)| p.offset).collect();
        assert_eq!(offsets, vec![0, 10, 20]);
        assert_eq!(browser.total_pages().await, 3);
    }

    #[tokio::test]
    async fn test_limit_change_resets_page() {
        let api = Arc::new(MockCaptureApi::new());
        api.push_packets(Ok(packet_page(&[1], 200)));
        let browser = ResourceBrowser::new(api.clone(), PacketResource);
        browser.set_resource(key("1")).await;
        browser.next_page().await;

        browser.set_limit(50).await;

        let state = browser.page_state().await;
        assert_eq!(state.current_page(), 0);
        assert_eq!(state.limit(), 50);
        let (_, params) = api.packet_calls().last().cloned().unwrap();
        assert_eq!((params.limit, params.offset), (50, 0));
    }

    #[tokio::test]
    async fn test_session_change_returns_to_first_page() {
        let api = Arc::new(MockCaptureApi::new());
        api.push_packets(Ok(packet_page(&[1], 100)));
        let browser = ResourceBrowser::new(api.clone(), PacketResource);
        browser.set_resource(key("1")).await;
        browser.next_page().await;

        assert!(browser.set_resource(key("2")).await);
        assert!(!browser.set_resource(key("2")).await);

        let (called_key, params) = api.packet_calls().last().cloned().unwrap();
        assert_eq!(called_key.session_id, "2");
        assert_eq!(params.offset, 0);

        browser.set_resource(None).await;
        assert!(browser.result().is_idle());
        assert_eq!(api.packet_calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_typing_fetches_once_with_last_value() {
        let api = Arc::new(MockCaptureApi::new());
        api.push_packets(Ok(packet_page(&[1], 100)));
        let browser = Arc::new(ResourceBrowser::new(api.clone(), PacketResource));
        browser.set_resource(key("1")).await;
        browser.go_to_page(3).await;
        let before = api.packet_calls().len();

        let mut debouncer = FilterDebouncer::new(ResourceKind::Packets, DEFAULT_DEBOUNCE);
        let follower = browser.follow_filters(debouncer.committed());

        for value in ["1", "19", "192", "192.168.1.1"] {
            debouncer.edit("src_ip", value).unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(api.packet_calls().len(), before);

        tokio::time::sleep(Duration::from_millis(600)).await;

        let calls = api.packet_calls();
        assert_eq!(calls.len(), before + 1);
        let (_, params) = calls.last().cloned().unwrap();
        assert_eq!(params.filters.get("src_ip"), Some("192.168.1.1"));
        assert_eq!(params.offset, 0);

        drop(debouncer);
        follower.await.unwrap();
    }
}
