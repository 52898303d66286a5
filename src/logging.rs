use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;
use crate::error::{AopError, Result};

/// Initialize the logging system
///
/// Logs go to a daily-rotated file under `config.directory`, and to stdout
/// as well when `config.console` is set. `RUST_LOG` overrides the
/// configured default filter.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    // Create logs directory if it doesn't exist
    std::fs::create_dir_all(&config.directory)?;

    // File appender - daily rotation
    let file_appender =
        RollingFileAppender::new(Rotation::DAILY, &config.directory, &config.file_name);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    let console_layer = config
        .console
        .then(|| fmt::layer().with_target(false).boxed());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| AopError::Logging(e.to_string()))?;

    tracing::info!("Logging system initialized");
    tracing::info!(
        "Log files location: {}",
        config.directory.join(&config.file_name).display()
    );

    Ok(())
}

/// Check if the configured logs directory exists
pub fn logs_dir_exists(config: &LoggingConfig) -> bool {
    Path::new(&config.directory).exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logs_dir_exists() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig::new().with_directory(dir.path().join("nested"));
        assert!(!logs_dir_exists(&config));

        std::fs::create_dir_all(&config.directory).unwrap();
        assert!(logs_dir_exists(&config));
    }
}
