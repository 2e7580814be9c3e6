//! One-shot loaders for session-level data (analytics, session detail,
//! session and database lists).

use netlens_core::Result;
use std::future::Future;
use tokio::sync::{Mutex, watch};

use crate::sequence::RequestSequence;

/// Observable state of a [`ResourceLoader`]. The previous `data` stays
/// visible while a reload is in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// A load tagged by [`ResourceLoader::start`] or [`ResourceLoader::restart`].
#[derive(Debug)]
pub(crate) struct LoadTicket {
    seq: u64,
}

/// Holds the latest value of one remote read. Responses that resolve after
/// a newer load (or after [`ResourceLoader::clear`]) are dropped.
pub struct ResourceLoader<T> {
    name: &'static str,
    sequence: Mutex<RequestSequence>,
    state: watch::Sender<LoadState<T>>,
}

impl<T: Clone + Send + Sync + 'static> ResourceLoader<T> {
    pub fn new(name: &'static str) -> Self {
        let (state, _) = watch::channel(LoadState::default());
        Self {
            name,
            sequence: Mutex::new(RequestSequence::default()),
            state,
        }
    }

    pub fn state(&self) -> LoadState<T> {
        self.state.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state.borrow().data.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState<T>> {
        self.state.subscribe()
    }

    /// Runs `request`; on failure the data is dropped and `failure_message`
    /// becomes the error. Returns whether the outcome was applied.
    pub async fn load<F>(&self, request: F, failure_message: &str) -> bool
    where
        F: Future<Output = Result<T>>,
    {
        let ticket = self.start().await;
        self.finish(ticket, request, failure_message).await
    }

    /// Tags a reload of the same data. The current value stays visible.
    pub(crate) async fn start(&self) -> LoadTicket {
        let mut sequence = self.sequence.lock().await;
        let seq = sequence.issue();
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        LoadTicket { seq }
    }

    /// Tags a load of different data (another session). Everything in
    /// flight becomes stale and the old value is dropped.
    pub(crate) async fn restart(&self) -> LoadTicket {
        let mut sequence = self.sequence.lock().await;
        sequence.invalidate();
        let seq = sequence.issue();
        self.state.send_modify(|state| {
            *state = LoadState {
                data: None,
                loading: true,
                error: None,
            }
        });
        LoadTicket { seq }
    }

    /// Awaits `request` and applies its outcome unless `ticket` went stale.
    pub(crate) async fn finish<F>(&self, ticket: LoadTicket, request: F, failure_message: &str) -> bool
    where
        F: Future<Output = Result<T>>,
    {
        let LoadTicket { seq } = ticket;
        let outcome = request.await;

        let mut sequence = self.sequence.lock().await;
        if !sequence.accept(seq) {
            tracing::debug!(loader = self.name, seq, "Discarding stale response");
            return false;
        }
        let still_loading = sequence.has_newer(seq);
        self.state.send_modify(|state| {
            match outcome {
                Ok(data) => {
                    state.data = Some(data);
                    state.error = None;
                }
                Err(err) => {
                    tracing::warn!(loader = self.name, error = %err, "Load failed");
                    state.data = None;
                    state.error = Some(failure_message.to_string());
                }
            }
            state.loading = still_loading;
        });
        true
    }

    /// Empties the state and discards everything in flight.
    pub async fn clear(&self) {
        self.sequence.lock().await.invalidate();
        self.state.send_modify(|state| *state = LoadState::default());
    }

    /// Hides the error banner without touching the data.
    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|state| state.error.take().is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netlens_core::NetlensError;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_success_and_failure() {
        let loader = ResourceLoader::new("analytics");

        assert!(loader.load(async { Ok(7u32) }, "Error al cargar los análisis.").await);
        assert_eq!(loader.data(), Some(7));

        loader
            .load(
                async { Err(NetlensError::network(None, "refused")) },
                "Error al cargar los análisis.",
            )
            .await;
        let state = loader.state();
        assert_eq!(state.data, None);
        assert_eq!(state.error.as_deref(), Some("Error al cargar los análisis."));
        assert!(!state.loading);

        loader.dismiss_error();
        assert!(loader.state().error.is_none());
    }

    #[tokio::test]
    async fn test_clear_drops_in_flight_response() {
        let loader = Arc::new(ResourceLoader::<u32>::new("sessions"));
        let (tx, rx) = oneshot::channel::<Result<u32>>();

        let pending = tokio::spawn({
            let loader = loader.clone();
            async move {
                loader
                    .load(
                        async move { rx.await.unwrap_or(Ok(0)) },
                        "Error al cargar las sesiones.",
                    )
                    .await
            }
        });
        while !loader.state().loading {
            tokio::task::yield_now().await;
        }

        loader.clear().await;
        tx.send(Ok(3)).unwrap();

        assert!(!pending.await.unwrap());
        assert_eq!(loader.state(), LoadState::default());
    }

    #[tokio::test]
    async fn test_restart_drops_old_data_and_late_response() {
        let loader = ResourceLoader::<u32>::new("session_detail");
        loader.load(async { Ok(1) }, "Error").await;

        let (tx, rx) = oneshot::channel::<Result<u32>>();
        let old = loader.start().await;
        let new = loader.restart().await;
        assert_eq!(loader.state().data, None);
        assert!(loader.state().loading);

        tx.send(Ok(2)).unwrap();
        assert!(
            !loader
                .finish(old, async move { rx.await.unwrap_or(Ok(0)) }, "Error")
                .await
        );
        assert_eq!(loader.state().data, None);

        assert!(loader.finish(new, async { Ok(3) }, "Error").await);
        assert_eq!(loader.data(), Some(3));
        assert!(!loader.state().loading);
    }
}
