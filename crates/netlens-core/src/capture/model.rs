//! Capture domain models.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A network interface the service can capture on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Parameters of `POST /capture/start`.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    pub interface_id: String,
    /// Capture duration in seconds.
    pub duration: u32,
    pub packet_count: Option<u32>,
}

impl CaptureRequest {
    pub fn new(interface_id: impl Into<String>, duration: u32) -> Self {
        Self {
            interface_id: interface_id.into(),
            duration,
            packet_count: None,
        }
    }

    pub fn with_packet_count(mut self, packet_count: u32) -> Self {
        self.packet_count = Some(packet_count);
        self
    }
}

/// Response of `POST /capture/start`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureResult {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub session_id: Option<i64>,
}

/// A pcap file stored on the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcapFile {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A local capture file to push through `POST /processing/upload-pcap`.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub path: PathBuf,
    pub process_now: bool,
    pub interface: Option<String>,
}

impl UploadRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            process_now: false,
            interface: None,
        }
    }

    pub fn process_now(mut self, process_now: bool) -> Self {
        self.process_now = process_now;
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }

    /// File name as sent in the multipart part.
    pub fn file_name(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// Only `.pcap` and `.pcapng` files are accepted by the service.
    pub fn has_capture_extension(&self) -> bool {
        self.path
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                ext == "pcap" || ext == "pcapng"
            })
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub processing: Option<bool>,
}

/// Response of `POST /processing/process-pcap`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessResult {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
}

/// A capture database file known to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbFile {
    pub name: String,
    #[serde(default)]
    pub size_kb: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_extension_check() {
        assert!(UploadRequest::new("/tmp/a.pcap").has_capture_extension());
        assert!(UploadRequest::new("/tmp/a.PCAPNG").has_capture_extension());
        assert!(!UploadRequest::new("/tmp/a.txt").has_capture_extension());
        assert!(!UploadRequest::new("/tmp/pcap").has_capture_extension());
    }

    #[test]
    fn test_upload_file_name() {
        let request = UploadRequest::new("/data/captures/morning.pcap")
            .process_now(true)
            .with_interface("eth0");
        assert_eq!(request.file_name().as_deref(), Some("morning.pcap"));
        assert!(request.process_now);
        assert_eq!(request.interface.as_deref(), Some("eth0"));
    }

    #[test]
    fn test_capture_request_builder() {
        let request = CaptureRequest::new("eth0", 30).with_packet_count(1000);
        assert_eq!(request.duration, 30);
        assert_eq!(request.packet_count, Some(1000));
    }
}
