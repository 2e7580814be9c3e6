//! Which paginated collection a view browses, and for which session.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Packets,
    Anomalies,
}

impl ResourceKind {
    /// Filter fields the service understands for this collection.
    pub fn filter_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Packets => &["src_ip", "dst_ip", "protocol"],
            Self::Anomalies => &["severity", "type"],
        }
    }

    pub fn default_limit(&self) -> u32 {
        match self {
            Self::Packets => 20,
            Self::Anomalies => 10,
        }
    }

    /// Message shown in place of the table when a load fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Packets => "Error al cargar los paquetes.",
            Self::Anomalies => "Error al cargar las anomalías.",
        }
    }
}

/// Identity of the session a fetch is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    pub db_file: Option<String>,
    pub session_id: String,
}

impl ResourceKey {
    pub fn new(db_file: Option<String>, session_id: impl Into<String>) -> Self {
        Self {
            db_file,
            session_id: session_id.into(),
        }
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.db_file {
            Some(db) => write!(f, "{}#{}", db, self.session_id),
            None => write!(f, "#{}", self.session_id),
        }
    }
}
