//! Logging bootstrap.
//!
//! Opt-in `tracing-subscriber` setup for hosts that do not install their
//! own subscriber. Honors `RUST_LOG` when set, falling back to the
//! configured filter.

use tracing_subscriber::EnvFilter;

use crate::error::{GalleryError, Result};

/// Output format for the bundled subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output for development.
    #[default]
    Pretty,
    /// Structured JSON lines for log pipelines.
    Json,
}

/// Subscriber configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset, e.g.
    /// `"info,core_sources=debug"`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails when the filter directive does not parse or a global subscriber
/// is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| GalleryError::InitializationFailed(e.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.format {
        LogFormat::Pretty => builder
            .try_init()
            .map_err(|e| GalleryError::InitializationFailed(e.to_string())),
        LogFormat::Json => builder
            .json()
            .try_init()
            .map_err(|e| GalleryError::InitializationFailed(e.to_string())),
    }
}
