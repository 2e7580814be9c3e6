//! HttpCaptureApi - REST client for the capture and analysis service.
//!
//! Every list endpoint tolerates missing arrays/totals; the wire models in
//! `netlens-core` default them. Failures are mapped onto `NetlensError`:
//! HTTP 409 becomes `Conflict` carrying the server's `detail` verbatim,
//! everything else becomes `Network`.

use async_trait::async_trait;
use netlens_core::analytics::SessionAnalytics;
use netlens_core::anomaly::AnomalyPage;
use netlens_core::api::{CaptureApi, ChatReply, ChatRequest};
use netlens_core::capture::{
    CaptureRequest, CaptureResult, DbFile, NetworkInterface, PcapFile, ProcessResult,
    UploadRequest, UploadResult,
};
use netlens_core::packet::PacketPage;
use netlens_core::query::{QueryParams, ResourceKey};
use netlens_core::session::{SessionDetail, SessionList};
use netlens_core::{NetlensError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the remote service. Cheap to clone; clones share the
/// connection pool.
#[derive(Clone, Debug)]
pub struct HttpCaptureApi {
    client: Client,
    base_url: String,
}

impl HttpCaptureApi {
    /// Creates a client for `base_url` (e.g. `http://localhost:8000/api`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| NetlensError::config(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|err| {
            NetlensError::network(
                err.status().map(|s| s.as_u16()),
                format!("Request failed: {err}"),
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, &body));
        }

        response.json::<T>().await.map_err(|err| {
            NetlensError::network(Some(status.as_u16()), format!("Invalid response body: {err}"))
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(String, String)]) -> Result<T> {
        let url = self.endpoint(path);
        tracing::debug!(%url, ?query, "GET");
        self.send(self.client.get(url).query(query)).await
    }
}

fn db_file_query(db_file: Option<&str>) -> Vec<(String, String)> {
    db_file
        .map(|db| vec![("db_file".to_string(), db.to_string())])
        .unwrap_or_default()
}

fn session_query(key: &ResourceKey, params: Option<&QueryParams>) -> Vec<(String, String)> {
    let mut query = params.map(QueryParams::to_query_pairs).unwrap_or_default();
    query.extend(db_file_query(key.db_file.as_deref()));
    query
}

#[derive(Deserialize)]
struct ErrorResponse {
    detail: serde_json::Value,
}

/// Maps a non-2xx response onto the error taxonomy.
fn map_http_error(status: StatusCode, body: &str) -> NetlensError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| match wrapper.detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::CONFLICT => NetlensError::conflict(message),
        _ => NetlensError::network(Some(status.as_u16()), message),
    }
}

#[async_trait]
impl CaptureApi for HttpCaptureApi {
    async fn list_interfaces(&self) -> Result<Vec<NetworkInterface>> {
        let interfaces: Option<Vec<NetworkInterface>> = self.get("capture/interfaces", &[]).await?;
        Ok(interfaces.unwrap_or_default())
    }

    async fn start_capture(&self, request: &CaptureRequest) -> Result<CaptureResult> {
        let mut query = vec![
            ("interface_id".to_string(), request.interface_id.clone()),
            ("duration".to_string(), request.duration.to_string()),
        ];
        if let Some(count) = request.packet_count {
            query.push(("packet_count".to_string(), count.to_string()));
        }
        tracing::info!(interface = %request.interface_id, duration = request.duration, "Starting capture");
        self.send(self.client.post(self.endpoint("capture/start")).query(&query))
            .await
    }

    async fn list_pcap_files(&self) -> Result<Vec<PcapFile>> {
        let files: Option<Vec<PcapFile>> = self.get("capture/files", &[]).await?;
        Ok(files.unwrap_or_default())
    }

    async fn upload_pcap(&self, request: &UploadRequest) -> Result<UploadResult> {
        let file_name = request.file_name().ok_or_else(|| {
            NetlensError::invalid_input(format!("{} is not a file", request.path.display()))
        })?;
        let bytes = tokio::fs::read(&request.path).await?;
        let mime = mime_guess::from_path(&request.path).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime.essence_str())
            .map_err(|err| NetlensError::internal(format!("Invalid MIME type: {err}")))?;

        let mut form = Form::new()
            .part("file", part)
            .text("process_now", request.process_now.to_string());
        if let Some(interface) = &request.interface {
            form = form.text("interface", interface.clone());
        }

        tracing::info!(file = %file_name, process_now = request.process_now, "Uploading capture file");
        self.send(
            self.client
                .post(self.endpoint("processing/upload-pcap"))
                .multipart(form),
        )
        .await
    }

    async fn process_pcap(
        &self,
        file_path: &str,
        interface: Option<&str>,
    ) -> Result<ProcessResult> {
        let mut query = vec![("file_path".to_string(), file_path.to_string())];
        if let Some(interface) = interface {
            query.push(("interface".to_string(), interface.to_string()));
        }
        self.send(
            self.client
                .post(self.endpoint("processing/process-pcap"))
                .query(&query),
        )
        .await
    }

    async fn list_db_files(&self) -> Result<Vec<DbFile>> {
        let files: Option<Vec<DbFile>> = self.get("database/list-db-files", &[]).await?;
        Ok(files.unwrap_or_default())
    }

    async fn list_sessions(&self, db_file: Option<&str>) -> Result<SessionList> {
        self.get("database/sessions", &db_file_query(db_file)).await
    }

    async fn session_detail(&self, key: &ResourceKey) -> Result<SessionDetail> {
        self.get(
            &format!("database/sessions/{}", key.session_id),
            &session_query(key, None),
        )
        .await
    }

    async fn session_packets(
        &self,
        key: &ResourceKey,
        params: &QueryParams,
    ) -> Result<PacketPage> {
        self.get(
            &format!("database/sessions/{}/packets", key.session_id),
            &session_query(key, Some(params)),
        )
        .await
    }

    async fn session_anomalies(
        &self,
        key: &ResourceKey,
        params: &QueryParams,
    ) -> Result<AnomalyPage> {
        self.get(
            &format!("database/sessions/{}/anomalies", key.session_id),
            &session_query(key, Some(params)),
        )
        .await
    }

    async fn session_analytics(&self, key: &ResourceKey) -> Result<SessionAnalytics> {
        self.get(
            &format!("database/analytics/{}", key.session_id),
            &session_query(key, None),
        )
        .await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        tracing::debug!(
            session_id = ?request.session_id,
            preference = %request.user_preference,
            "POST ai/chat"
        );
        self.send(self.client.post(self.endpoint("ai/chat")).json(request))
            .await
    }

    async fn clear_chat(&self) -> Result<()> {
        let _ack: serde_json::Value = self
            .send(self.client.post(self.endpoint("ai/clear-chat")))
            .await?;
        Ok(())
    }
}
