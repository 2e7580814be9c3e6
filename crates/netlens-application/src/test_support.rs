//! Mock `CaptureApi` implementations for unit tests.

use async_trait::async_trait;
use netlens_core::analytics::SessionAnalytics;
use netlens_core::anomaly::{Anomaly, AnomalyPage, Severity};
use netlens_core::api::{CaptureApi, ChatReply, ChatRequest};
use netlens_core::capture::{
    CaptureRequest, CaptureResult, DbFile, NetworkInterface, PcapFile, ProcessResult,
    UploadRequest, UploadResult,
};
use netlens_core::packet::{Packet, PacketPage};
use netlens_core::query::{QueryParams, ResourceKey};
use netlens_core::session::{CaptureSession, SessionDetail, SessionList};
use netlens_core::{NetlensError, Result};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;

pub(crate) fn packet(id: i64) -> Packet {
    Packet {
        id,
        packet_number: id,
        timestamp: 1_700_000_000.0,
        src_ip: Some("10.0.0.1".to_string()),
        dst_ip: Some("10.0.0.2".to_string()),
        protocol: Some("TCP".to_string()),
        length: 60,
        details: None,
        anomalies: Vec::new(),
    }
}

pub(crate) fn packet_page(ids: &[i64], total: u64) -> PacketPage {
    PacketPage {
        packets: ids.iter().copied().map(packet).collect(),
        total,
    }
}

pub(crate) fn anomaly(id: i64) -> Anomaly {
    Anomaly {
        id,
        anomaly_type: "port_scan".to_string(),
        description: "SYN sweep".to_string(),
        severity: Severity::High,
        packet: None,
    }
}

pub(crate) fn session(id: i64) -> CaptureSession {
    CaptureSession {
        id,
        file_name: format!("capture_{id}.pcap"),
        capture_date: None,
        interface: None,
        packet_count: Some(100),
        duration: None,
    }
}

/// Replies from per-endpoint queues and records every call. An empty queue
/// answers with an empty success.
#[derive(Default)]
pub(crate) struct MockCaptureApi {
    packets: Mutex<VecDeque<Result<PacketPage>>>,
    anomalies: Mutex<VecDeque<Result<AnomalyPage>>>,
    chats: Mutex<VecDeque<Result<ChatReply>>>,
    clears: Mutex<VecDeque<Result<()>>>,
    analytics: Mutex<VecDeque<Result<SessionAnalytics>>>,
    sessions: Mutex<Vec<CaptureSession>>,
    packet_calls: Mutex<Vec<(ResourceKey, QueryParams)>>,
    anomaly_calls: Mutex<Vec<(ResourceKey, QueryParams)>>,
    chat_calls: Mutex<Vec<ChatRequest>>,
    clear_calls: Mutex<usize>,
    session_list_calls: Mutex<Vec<Option<String>>>,
    uploads: Mutex<Vec<UploadRequest>>,
}

impl MockCaptureApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_packets(&self, page: Result<PacketPage>) {
        self.packets.lock().unwrap().push_back(page);
    }

    pub(crate) fn push_anomalies(&self, page: Result<AnomalyPage>) {
        self.anomalies.lock().unwrap().push_back(page);
    }

    pub(crate) fn push_chat(&self, reply: Result<&str>) {
        self.chats.lock().unwrap().push_back(reply.map(|r| ChatReply {
            response: r.to_string(),
        }));
    }

    pub(crate) fn push_clear(&self, outcome: Result<()>) {
        self.clears.lock().unwrap().push_back(outcome);
    }

    pub(crate) fn push_analytics(&self, analytics: Result<SessionAnalytics>) {
        self.analytics.lock().unwrap().push_back(analytics);
    }

    pub(crate) fn set_sessions(&self, sessions: Vec<CaptureSession>) {
        *self.sessions.lock().unwrap() = sessions;
    }

    pub(crate) fn packet_calls(&self) -> Vec<(ResourceKey, QueryParams)> {
        self.packet_calls.lock().unwrap().clone()
    }

    pub(crate) fn anomaly_calls(&self) -> Vec<(ResourceKey, QueryParams)> {
        self.anomaly_calls.lock().unwrap().clone()
    }

    pub(crate) fn chat_calls(&self) -> Vec<ChatRequest> {
        self.chat_calls.lock().unwrap().clone()
    }

    pub(crate) fn clear_calls(&self) -> usize {
        *self.clear_calls.lock().unwrap()
    }

    pub(crate) fn session_list_calls(&self) -> Vec<Option<String>> {
        self.session_list_calls.lock().unwrap().clone()
    }

    pub(crate) fn uploads(&self) -> Vec<UploadRequest> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl CaptureApi for MockCaptureApi {
    async fn list_interfaces(&self) -> Result<Vec<NetworkInterface>> {
        Ok(vec![NetworkInterface {
            id: "eth0".to_string(),
            name: "eth0".to_string(),
            description: None,
        }])
    }

    async fn start_capture(&self, request: &CaptureRequest) -> Result<CaptureResult> {
        Ok(CaptureResult {
            message: Some("Captura completada con éxito".to_string()),
            file_name: Some(format!("capture_{}.pcap", request.interface_id)),
            ..CaptureResult::default()
        })
    }

    async fn list_pcap_files(&self) -> Result<Vec<PcapFile>> {
        Ok(Vec::new())
    }

    async fn upload_pcap(&self, request: &UploadRequest) -> Result<UploadResult> {
        self.uploads.lock().unwrap().push(request.clone());
        Ok(UploadResult {
            file_name: request.file_name().unwrap_or_default(),
            ..UploadResult::default()
        })
    }

    async fn process_pcap(&self, file_path: &str, _interface: Option<&str>) -> Result<ProcessResult> {
        Ok(ProcessResult {
            message: None,
            file_path: Some(file_path.to_string()),
        })
    }

    async fn list_db_files(&self) -> Result<Vec<DbFile>> {
        Ok(vec![DbFile {
            name: "database_1.db".to_string(),
            size_kb: 12.0,
        }])
    }

    async fn list_sessions(&self, db_file: Option<&str>) -> Result<SessionList> {
        self.session_list_calls
            .lock()
            .unwrap()
            .push(db_file.map(str::to_string));
        Ok(SessionList {
            sessions: self.sessions.lock().unwrap().clone(),
        })
    }

    async fn session_detail(&self, key: &ResourceKey) -> Result<SessionDetail> {
        let id: i64 = key
            .session_id
            .parse()
            .map_err(|_| NetlensError::not_found("session", key.session_id.clone()))?;
        Ok(SessionDetail {
            session: session(id),
            extra: Default::default(),
        })
    }

    async fn session_packets(&self, key: &ResourceKey, params: &QueryParams) -> Result<PacketPage> {
        self.packet_calls
            .lock()
            .unwrap()
            .push((key.clone(), params.clone()));
        self.packets
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(PacketPage::default()))
    }

    async fn session_anomalies(
        &self,
        key: &ResourceKey,
        params: &QueryParams,
    ) -> Result<AnomalyPage> {
        self.anomaly_calls
            .lock()
            .unwrap()
            .push((key.clone(), params.clone()));
        self.anomalies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(AnomalyPage::default()))
    }

    async fn session_analytics(&self, _key: &ResourceKey) -> Result<SessionAnalytics> {
        self.analytics
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SessionAnalytics::default()))
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.chat_calls.lock().unwrap().push(request.clone());
        self.chats
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ChatReply::default()))
    }

    async fn clear_chat(&self) -> Result<()> {
        *self.clear_calls.lock().unwrap() += 1;
        self.clears.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// Holds packet and chat calls open until the test releases them, so tests
/// can choose the order in which responses resolve.
#[derive(Default)]
pub(crate) struct GatedApi {
    packets: Mutex<Vec<Option<oneshot::Sender<Result<PacketPage>>>>>,
    chats: Mutex<Vec<Option<oneshot::Sender<Result<ChatReply>>>>>,
}

impl GatedApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn call_count(&self) -> usize {
        self.packets.lock().unwrap().len() + self.chats.lock().unwrap().len()
    }

    /// Yields until `n` calls are parked.
    pub(crate) async fn wait_for_calls(&self, n: usize) {
        while self.call_count() < n {
            tokio::task::yield_now().await;
        }
    }

    /// Resolves the `index`-th packet call (0-based, in call order).
    pub(crate) fn release(&self, index: usize, page: Result<PacketPage>) {
        let sender = self.packets.lock().unwrap()[index]
            .take()
            .expect("call already released");
        let _ = sender.send(page);
    }

    /// Resolves the `index`-th chat call.
    pub(crate) fn release_chat(&self, index: usize, reply: Result<&str>) {
        let sender = self.chats.lock().unwrap()[index]
            .take()
            .expect("call already released");
        let _ = sender.send(reply.map(|r| ChatReply {
            response: r.to_string(),
        }));
    }
}

#[async_trait]
impl CaptureApi for GatedApi {
    async fn list_interfaces(&self) -> Result<Vec<NetworkInterface>> {
        Ok(Vec::new())
    }

    async fn start_capture(&self, _request: &CaptureRequest) -> Result<CaptureResult> {
        Ok(CaptureResult::default())
    }

    async fn list_pcap_files(&self) -> Result<Vec<PcapFile>> {
        Ok(Vec::new())
    }

    async fn upload_pcap(&self, _request: &UploadRequest) -> Result<UploadResult> {
        Ok(UploadResult::default())
    }

    async fn process_pcap(&self, _file_path: &str, _interface: Option<&str>) -> Result<ProcessResult> {
        Ok(ProcessResult::default())
    }

    async fn list_db_files(&self) -> Result<Vec<DbFile>> {
        Ok(Vec::new())
    }

    async fn list_sessions(&self, _db_file: Option<&str>) -> Result<SessionList> {
        Ok(SessionList::default())
    }

    async fn session_detail(&self, key: &ResourceKey) -> Result<SessionDetail> {
        Err(NetlensError::not_found("session", key.session_id.clone()))
    }

    async fn session_packets(&self, _key: &ResourceKey, _params: &QueryParams) -> Result<PacketPage> {
        let (tx, rx) = oneshot::channel();
        self.packets.lock().unwrap().push(Some(tx));
        rx.await
            .unwrap_or_else(|_| Err(NetlensError::internal("gate dropped")))
    }

    async fn session_anomalies(
        &self,
        _key: &ResourceKey,
        _params: &QueryParams,
    ) -> Result<AnomalyPage> {
        Ok(AnomalyPage::default())
    }

    async fn session_analytics(&self, _key: &ResourceKey) -> Result<SessionAnalytics> {
        Ok(SessionAnalytics::default())
    }

    async fn chat(&self, _request: &ChatRequest) -> Result<ChatReply> {
        let (tx, rx) = oneshot::channel();
        self.chats.lock().unwrap().push(Some(tx));
        rx.await
            .unwrap_or_else(|_| Err(NetlensError::internal("gate dropped")))
    }

    async fn clear_chat(&self) -> Result<()> {
        Ok(())
    }
}
