//! Trailing-edge debounce between filter inputs and the committed filters.
//!
//! Each edit restarts a single quiet-period timer. When it expires the
//! draft becomes the committed [`FilterSet`], published on a `watch`
//! channel that a [`ResourceBrowser`](crate::ResourceBrowser) follows.

use netlens_core::Result;
use netlens_core::query::{FilterDraft, FilterSet, ResourceKind};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

enum DraftEvent {
    Edited(FilterSet),
    Flush,
}

/// Owns the filter inputs of one view.
///
/// Must be created inside a Tokio runtime. Dropping it stops the timer; a
/// pending draft is discarded.
pub struct FilterDebouncer {
    draft: FilterDraft,
    events: mpsc::UnboundedSender<DraftEvent>,
    committed: watch::Receiver<FilterSet>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl FilterDebouncer {
    pub fn new(kind: ResourceKind, delay: Duration) -> Self {
        let (events, rx) = mpsc::unbounded_channel();
        let (commit_tx, committed) = watch::channel(FilterSet::new());
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_timer(rx, commit_tx, delay, cancel.clone(), kind));
        Self {
            draft: FilterDraft::new(kind),
            events,
            committed,
            cancel,
            task,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.draft.kind()
    }

    /// The uncommitted input values.
    pub fn draft(&self) -> &FilterDraft {
        &self.draft
    }

    /// Records one keystroke's worth of input and restarts the timer.
    pub fn edit(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        self.draft.set(field, value)?;
        let _ = self
            .events
            .send(DraftEvent::Edited(self.draft.to_filter_set()));
        Ok(())
    }

    /// Commits the current draft now instead of waiting for the timer.
    pub fn flush(&self) {
        let _ = self.events.send(DraftEvent::Flush);
    }

    /// The last committed filters.
    pub fn current(&self) -> FilterSet {
        self.committed.borrow().clone()
    }

    /// Receiver notified whenever the committed filters change value.
    pub fn committed(&self) -> watch::Receiver<FilterSet> {
        self.committed.clone()
    }
}

impl Drop for FilterDebouncer {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

async fn run_timer(
    mut events: mpsc::UnboundedReceiver<DraftEvent>,
    committed: watch::Sender<FilterSet>,
    delay: Duration,
    cancel: CancellationToken,
    kind: ResourceKind,
) {
    let mut pending: Option<FilterSet> = None;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            event = events.recv() => match event {
                Some(DraftEvent::Edited(filters)) => pending = Some(filters),
                Some(DraftEvent::Flush) => {
                    if let Some(filters) = pending.take() {
                        commit(&committed, filters, kind);
                    }
                }
                None => break,
            },
            _ = tokio::time::sleep(delay), if pending.is_some() => {
                if let Some(filters) = pending.take() {
                    commit(&committed, filters, kind);
                }
            }
        }
    }
    tracing::trace!(%kind, "Filter debounce timer stopped");
}

fn commit(committed: &watch::Sender<FilterSet>, filters: FilterSet, kind: ResourceKind) {
    let changed = committed.send_if_modified(|current| {
        if *current == filters {
            return false;
        }
        *current = filters;
        true
    });
    if changed {
        tracing::debug!(%kind, filters = ?committed.borrow().clone(), "Filters committed");
    }
}
