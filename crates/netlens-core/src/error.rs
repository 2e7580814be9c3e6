//! Error types for the Netlens client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every Netlens crate.
///
/// Remote failures are split into `Network` (the request could not complete
/// or the service answered with a failure status) and `Conflict` (HTTP 409,
/// e.g. a capture file that was already uploaded).
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum NetlensError {
    /// The request could not complete, or the service rejected it.
    #[error("Network error{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Network {
        status: Option<u16>,
        message: String,
    },

    /// Duplicate resource reported by the service (HTTP 409).
    #[error("{0}")]
    Conflict(String),

    /// The service has no `entity_type` with this id.
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    #[error("Could not decode {format}: {message}")]
    Serialization { format: String, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Local file system failure (config file, capture being uploaded).
    #[error("I/O failure: {message}")]
    Io { message: String },

    /// Caller supplied something the client refuses to send.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unexpected failure: {0}")]
    Internal(String),
}

impl NetlensError {
    pub fn network(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Network {
            status,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Also true for a network error carrying HTTP 404.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Network { status, .. } => *status == Some(404),
            _ => false,
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Message to show to an operator for a failed remote call.
    ///
    /// Conflicts carry the server's own wording and are shown verbatim; every
    /// other failure collapses to `fallback`, the message of the view that
    /// issued the call.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Conflict(detail) => detail.clone(),
            Self::InvalidInput(detail) => detail.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<std::io::Error> for NetlensError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{err} ({:?})", err.kind()),
        }
    }
}

impl From<serde_json::Error> for NetlensError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "json".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for NetlensError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "toml".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for NetlensError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "toml".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for NetlensError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// A type alias for `Result<T, NetlensError>`.
pub type Result<T> = std::result::Result<T, NetlensError>;
