//! Capture session models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One recorded or uploaded capture inside a database file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureSession {
    pub id: i64,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub capture_date: Option<String>,
    #[serde(default)]
    pub interface: Option<String>,
    #[serde(default)]
    pub packet_count: Option<u64>,
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Body of `GET /database/sessions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionList {
    #[serde(default)]
    pub sessions: Vec<CaptureSession>,
}

/// Body of `GET /database/sessions/{id}`.
///
/// Known fields are typed; whatever else the service sends is kept in
/// `extra` for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: CaptureSession,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
