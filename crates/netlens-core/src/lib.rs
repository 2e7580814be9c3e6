//! Domain model for the Netlens capture-analysis client.
//!
//! Everything here is free of I/O: wire models of the remote service, the
//! query parameter model used by paginated views, chat state and the slash
//! command interpreter, and the [`CaptureApi`](api::CaptureApi) contract
//! implemented by `netlens-interaction`.

pub mod analytics;
pub mod anomaly;
pub mod api;
pub mod capture;
pub mod chat;
pub mod error;
pub mod packet;
pub mod query;
pub mod session;
pub mod slash_command;

// Re-export common error type
pub use error::{NetlensError, Result};
