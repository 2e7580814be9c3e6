pub mod capture;
pub mod chat;
pub mod config;
pub mod database;

use anyhow::Result;
use netlens_core::api::CaptureApi;
use netlens_infrastructure::ClientConfig;
use netlens_interaction::HttpCaptureApi;
use std::sync::Arc;

/// What every remote command needs.
pub struct Context {
    pub config: ClientConfig,
    pub api: Arc<dyn CaptureApi>,
}

impl Context {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api = HttpCaptureApi::with_timeout(&config.api.base_url, config.api.timeout())?;
        tracing::debug!(base_url = %api.base_url(), "Using analysis service");
        Ok(Self {
            config,
            api: Arc::new(api),
        })
    }
}
