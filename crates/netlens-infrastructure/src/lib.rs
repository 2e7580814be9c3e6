//! Infrastructure for the Netlens client: configuration, paths, logging.

pub mod config_service;
pub mod logging;
pub mod paths;

pub use config_service::{ApiConfig, BrowseConfig, ClientConfig, ConfigService, LoggingConfig};
pub use logging::{LogTarget, init_logging};
pub use paths::{NetlensPaths, PathError};
