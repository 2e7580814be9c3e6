//! Contract with the remote capture and analysis service.
//!
//! Front-ends and application services hold an `Arc<dyn CaptureApi>` handed
//! to them at construction; nothing reaches for a global client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analytics::SessionAnalytics;
use crate::anomaly::AnomalyPage;
use crate::capture::{
    CaptureRequest, CaptureResult, DbFile, NetworkInterface, PcapFile, ProcessResult,
    UploadRequest, UploadResult,
};
use crate::chat::UserPreference;
use crate::error::Result;
use crate::packet::PacketPage;
use crate::query::{QueryParams, ResourceKey};
use crate::session::{SessionDetail, SessionList};

/// Body of `POST /ai/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
    pub db_file: Option<String>,
    pub user_preference: UserPreference,
}

/// Body of a successful `POST /ai/chat`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: String,
}

#[async_trait]
pub trait CaptureApi: Send + Sync {
    // Capture orchestration
    async fn list_interfaces(&self) -> Result<Vec<NetworkInterface>>;
    async fn start_capture(&self, request: &CaptureRequest) -> Result<CaptureResult>;
    async fn list_pcap_files(&self) -> Result<Vec<PcapFile>>;
    async fn upload_pcap(&self, request: &UploadRequest) -> Result<UploadResult>;
    async fn process_pcap(&self, file_path: &str, interface: Option<&str>)
    -> Result<ProcessResult>;

    // Capture databases
    async fn list_db_files(&self) -> Result<Vec<DbFile>>;
    async fn list_sessions(&self, db_file: Option<&str>) -> Result<SessionList>;
    async fn session_detail(&self, key: &ResourceKey) -> Result<SessionDetail>;
    async fn session_packets(&self, key: &ResourceKey, params: &QueryParams)
    -> Result<PacketPage>;
    async fn session_anomalies(
        &self,
        key: &ResourceKey,
        params: &QueryParams,
    ) -> Result<AnomalyPage>;
    async fn session_analytics(&self, key: &ResourceKey) -> Result<SessionAnalytics>;

    // Assistant
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply>;
    async fn clear_chat(&self) -> Result<()>;
}
