//! Capture sessions and the operator's current selection.

pub mod model;
pub mod selection;

pub use model::{CaptureSession, SessionDetail, SessionList};
pub use selection::SessionSelection;
