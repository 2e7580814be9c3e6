//! Query parameter model shared by the packet and anomaly views.
//!
//! A view is described by a [`PageState`] and a committed [`FilterSet`];
//! together they produce the [`QueryParams`] sent to the service. Raw,
//! uncommitted keystrokes live in a [`FilterDraft`] until the debouncer
//! commits them.

pub mod filters;
pub mod page;
pub mod params;
pub mod resource;
pub mod result;

pub use filters::{FilterDraft, FilterSet};
pub use page::PageState;
pub use params::QueryParams;
pub use resource::{ResourceKey, ResourceKind};
pub use result::{FetchResult, Page};
