//! Capture orchestration models: interfaces, capture runs, pcap files.

pub mod model;

pub use model::{
    CaptureRequest, CaptureResult, DbFile, NetworkInterface, PcapFile, ProcessResult,
    UploadRequest, UploadResult,
};
