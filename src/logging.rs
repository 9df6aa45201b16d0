//! Subscriber setup for `tracing` output.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("failed to install tracing subscriber: {0}")]
    AlreadyInitialized(String),
}

/// Log output settings, usually read from the `logging` block of a
/// pipeline config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `nlpiper=debug,transformers=trace`.
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit one JSON object per event instead of human readable lines.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl LoggingConfig {
    pub(crate) fn validate(&self) -> Result<(), LoggingError> {
        self.filter().map(|_| ())
    }

    fn filter(&self) -> Result<EnvFilter, LoggingError> {
        EnvFilter::try_new(&self.level).map_err(|err| LoggingError::InvalidFilter {
            filter: self.level.clone(),
            reason: err.to_string(),
        })
    }
}

/// Installs a global `fmt` subscriber.
///
/// `RUST_LOG`, when set and valid, takes precedence over `config.level`.
/// Returns an error instead of panicking if a global subscriber is already
/// installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => config.filter()?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| LoggingError::AlreadyInitialized(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_info() {
        let cfg: LoggingConfig = serde_yaml::from_str("json: true").unwrap();
        assert_eq!(cfg.level, "info");
        assert!(cfg.json);
    }

    #[test]
    fn bad_filter_is_rejected() {
        let cfg = LoggingConfig {
            level: "nlpiper=notalevel".to_string(),
            json: false,
        };
        assert!(matches!(
            cfg.validate(),
            Err(LoggingError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn second_init_reports_error() {
        let cfg = LoggingConfig::default();
        let _ = init_tracing(&cfg);
        assert!(matches!(
            init_tracing(&cfg),
            Err(LoggingError::AlreadyInitialized(_))
        ));
    }
}
