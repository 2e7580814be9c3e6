//! Application layer for Netlens.
//!
//! Coordinates the domain model with the remote service: the debounced
//! filter pipeline and paginated fetchers behind the packet and anomaly
//! views, one-shot loaders for session-level data, the chat session
//! controller, and capture orchestration.

pub mod browser;
pub mod capture_service;
pub mod chat_controller;
pub mod debounce;
pub mod fetcher;
pub mod loader;
mod sequence;
pub mod workspace;

#[cfg(test)]
mod test_support;

pub use browser::ResourceBrowser;
pub use capture_service::CaptureService;
pub use chat_controller::{ChatSessionController, SendOutcome};
pub use debounce::{DEFAULT_DEBOUNCE, FilterDebouncer};
pub use fetcher::{AnomalyResource, PacketResource, PagedResource, PaginatedResourceFetcher};
pub use loader::{LoadState, ResourceLoader};
pub use workspace::{AnalysisWorkspace, PageSizes};
