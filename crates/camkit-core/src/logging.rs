//! # Logging
//!
//! `tracing` subscriber setup for programs embedding camkit-core.
//!
//! The core itself only emits events. Call [`init`] once from the host
//! program: `RUST_LOG` wins over the configured filter, and
//! `CAMKIT_LOG_FORMAT=json` switches to machine-parseable output.

use crate::CamError;
use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when neither `RUST_LOG` nor the configuration sets one.
pub const DEFAULT_FILTER: &str = "camkit=info";

/// Environment variable selecting the output format (`text` or `json`).
pub const FORMAT_ENV: &str = "CAMKIT_LOG_FORMAT";

/// Output format after applying the environment override.
#[must_use]
pub fn effective_format(config: &LoggingConfig) -> LogFormat {
    match std::env::var(FORMAT_ENV).as_deref() {
        Ok("json") => LogFormat::Json,
        Ok("text") => LogFormat::Text,
        _ => config.format,
    }
}

/// Install the global subscriber.
///
/// Returns `Ok(false)` if a global subscriber was already installed, so
/// calling this more than once is harmless.
pub fn init(config: &LoggingConfig) -> Result<bool, CamError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.filter.as_deref().unwrap_or(DEFAULT_FILTER))
            .map_err(|e| CamError::ConfigError(format!("invalid log filter: {e}")))?,
    };

    let installed = match effective_format(config) {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init(),
    };

    Ok(installed.is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let config = LoggingConfig::default();
        init(&config).expect("first init");
        assert_eq!(init(&config), Ok(false));
    }

    #[test]
    fn invalid_filter_is_config_error() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            format: LogFormat::Text,
            filter: Some("camkit=verbose".to_string()),
        };
        assert!(matches!(init(&config), Err(CamError::ConfigError(_))));
    }
}
