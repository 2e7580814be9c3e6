//! HTTP implementation of the capture service contract.

pub mod http_api;

pub use http_api::{HttpCaptureApi, DEFAULT_BASE_URL};
