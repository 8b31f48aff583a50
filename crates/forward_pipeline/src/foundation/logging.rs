//! Logging utilities and structured logging support

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Once;

pub use log::{debug, error, info, trace, warn};

/// Logger configuration
///
/// `filter` follows the `env_logger` filter syntax (e.g. "info",
/// "forward_pipeline=trace"). When it is absent, `RUST_LOG` is honored and
/// `level` is the final fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when neither `filter` nor `RUST_LOG` is set
    pub level: String,
    /// Explicit filter directives, overriding `RUST_LOG`
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            filter: None,
        }
    }
}

impl LoggingConfig {
    /// Set the fallback log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Set explicit filter directives
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    fn level_filter(&self) -> log::LevelFilter {
        log::LevelFilter::from_str(&self.level).unwrap_or(log::LevelFilter::Info)
    }
}

static INIT: Once = Once::new();

/// Initialize the logging system once
///
/// Subsequent calls are ignored, as are failures caused by another logger
/// already being installed by the host process.
pub fn init_logging(config: &LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = &config.filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(config.level_filter());
        }

        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
