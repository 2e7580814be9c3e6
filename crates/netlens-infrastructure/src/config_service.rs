//! Client configuration.
//!
//! Loaded from `~/.config/netlens/config.toml`; a missing file means
//! defaults. `NETLENS_API_URL` and `NETLENS_TIMEOUT_SECS` override the file.

use netlens_core::{NetlensError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths::NetlensPaths;

pub const ENV_API_URL: &str = "NETLENS_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "NETLENS_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub browse: BrowseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseConfig {
    pub packet_page_size: u32,
    pub anomaly_page_size: u32,
    /// Quiet period before typed filters are applied, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            packet_page_size: 20,
            anomaly_page_size: 10,
            debounce_ms: 500,
        }
    }
}

impl BrowseConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `NETLENS_LOG` is unset.
    pub level: String,
    /// Overrides the platform logs directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

/// Reads and writes [`ClientConfig`].
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the platform config file location.
    pub fn new() -> Result<Self> {
        let path = NetlensPaths::config_file().map_err(|e| NetlensError::config(e.to_string()))?;
        Ok(Self { path })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file (or defaults) and applies environment overrides.
    pub fn load(&self) -> Result<ClientConfig> {
        let mut config = self.load_file()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Loads the file only; defaults when it does not exist.
    pub fn load_file(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No config file, using defaults");
            return Ok(ClientConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Writes `config`, creating the parent directory if needed.
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Writes the default configuration unless a file already exists.
    /// Returns whether a file was written.
    pub fn write_default(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&ClientConfig::default())?;
        Ok(true)
    }
}

fn apply_env_overrides<F>(config: &mut ClientConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        config.api.base_url = url;
    }
    if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
        config.api.timeout_secs = raw.trim().parse().map_err(|_| {
            NetlensError::config(format!("{ENV_TIMEOUT_SECS} must be a number, got '{raw}'"))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));
        let config = service.load_file().unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.browse.debounce(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"http://capture-box:9000/api\"\n\n[browse]\npacket_page_size = 50\n",
        )
        .unwrap();

        let config = ConfigService::with_path(&path).load_file().unwrap();
        assert_eq!(config.api.base_url, "http://capture-box:9000/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.browse.packet_page_size, 50);
        assert_eq!(config.browse.anomaly_page_size, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_toml_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();
        let err = ConfigService::with_path(&path).load_file().unwrap_err();
        assert!(matches!(err, NetlensError::Serialization { .. }));
    }

    #[test]
    fn test_write_default_once() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("nested/config.toml"));
        assert!(service.write_default().unwrap());
        assert!(!service.write_default().unwrap());
        assert_eq!(service.load_file().unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ClientConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            ENV_API_URL => Some("http://10.0.0.5:8000/api".to_string()),
            ENV_TIMEOUT_SECS => Some("5".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:8000/api");
        assert_eq!(config.api.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_bad_timeout_override() {
        let mut config = ClientConfig::default();
        let err = apply_env_overrides(&mut config, |key| {
            (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(err.is_config());
    }
}
