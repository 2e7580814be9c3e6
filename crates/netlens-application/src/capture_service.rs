//! Capture orchestration.
//!
//! Thin use case over [`CaptureApi`] for everything that happens before a
//! session exists: listing interfaces, running a live capture, uploading or
//! reprocessing capture files, and listing the databases they land in.

use netlens_core::api::CaptureApi;
use netlens_core::capture::{
    CaptureRequest, CaptureResult, DbFile, NetworkInterface, PcapFile, ProcessResult,
    UploadRequest, UploadResult,
};
use netlens_core::{NetlensError, Result};
use std::sync::Arc;

pub const INVALID_EXTENSION: &str = "El archivo debe tener extensión .pcap o .pcapng";

/// Use case for capture and file operations.
///
/// Local validation happens here so obviously bad requests never reach the
/// service. Errors are returned as-is; a `Conflict` carries the service's
/// own message and is meant to be shown verbatim.
pub struct CaptureService {
    api: Arc<dyn CaptureApi>,
}

impl CaptureService {
    pub fn new(api: Arc<dyn CaptureApi>) -> Self {
        Self { api }
    }

    pub async fn interfaces(&self) -> Result<Vec<NetworkInterface>> {
        self.api.list_interfaces().await
    }

    /// Runs a live capture on the remote host and waits for it to finish.
    ///
    /// # Arguments
    ///
    /// * `request` - Interface, duration in seconds and optional packet cap
    pub async fn start_capture(&self, request: &CaptureRequest) -> Result<CaptureResult> {
        if request.interface_id.trim().is_empty() {
            return Err(NetlensError::invalid_input("No se ha seleccionado una interfaz"));
        }
        if request.duration == 0 {
            return Err(NetlensError::invalid_input(
                "La duración debe ser mayor que cero",
            ));
        }
        if request.packet_count == Some(0) {
            return Err(NetlensError::invalid_input(
                "El número de paquetes debe ser mayor que cero",
            ));
        }
        let result = self.api.start_capture(request).await?;
        tracing::info!(
            interface = %request.interface_id,
            file = ?result.file_name,
            session_id = ?result.session_id,
            "Capture finished"
        );
        Ok(result)
    }

    pub async fn files(&self) -> Result<Vec<PcapFile>> {
        self.api.list_pcap_files().await
    }

    /// Uploads a local `.pcap`/`.pcapng` file, optionally processing it
    /// into a session right away.
    pub async fn upload(&self, request: &UploadRequest) -> Result<UploadResult> {
        if !request.has_capture_extension() {
            return Err(NetlensError::invalid_input(INVALID_EXTENSION));
        }
        match self.api.upload_pcap(request).await {
            Ok(result) => {
                tracing::info!(file = %result.file_name, processing = ?result.processing, "Upload accepted");
                Ok(result)
            }
            Err(err) => {
                if err.is_conflict() {
                    tracing::warn!(path = %request.path.display(), "Capture file already on server");
                }
                Err(err)
            }
        }
    }

    /// Processes a capture file that already sits on the server.
    pub async fn process_file(&self, file_path: &str, interface: Option<&str>) -> Result<ProcessResult> {
        if file_path.trim().is_empty() {
            return Err(NetlensError::invalid_input("Ruta de archivo vacía"));
        }
        self.api.process_pcap(file_path, interface).await
    }

    pub async fn db_files(&self) -> Result<Vec<DbFile>> {
        self.api.list_db_files().await
    }
}
