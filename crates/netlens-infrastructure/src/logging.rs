//! Tracing subscriber setup shared by the binaries.
//!
//! Logs always go to a daily-rolling file under the logs directory. Line
//! oriented commands may also log to stderr; full-screen front-ends must not,
//! or they would draw over the terminal.

use netlens_core::{NetlensError, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config_service::LoggingConfig;
use crate::paths::NetlensPaths;

pub const ENV_LOG: &str = "NETLENS_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// File only (REPL, TUI).
    File,
    /// File plus stderr (one-shot commands).
    FileAndStderr,
}

/// Installs the global subscriber. Keep the returned guard alive for the
/// lifetime of the process so buffered lines are flushed.
pub fn init_logging(config: &LoggingConfig, target: LogTarget, file_prefix: &str) -> Result<WorkerGuard> {
    let directory = match &config.directory {
        Some(dir) => dir.clone(),
        None => NetlensPaths::logs_dir().map_err(|e| NetlensError::config(e.to_string()))?,
    };
    std::fs::create_dir_all(&directory)?;

    let appender = tracing_appender::rolling::daily(&directory, format!("{file_prefix}.log"));
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(env_filter(&config.level));

    let stderr_layer = (target == LogTarget::FileAndStderr).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .with_filter(env_filter("warn"))
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| NetlensError::internal(format!("Failed to install tracing subscriber: {e}")))?;

    tracing::debug!(directory = %directory.display(), "Logging initialised");
    Ok(guard)
}

/// `NETLENS_LOG` wins over the configured level.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(default_level))
}
