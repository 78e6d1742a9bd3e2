//! Tracing bootstrap for the gateway binaries.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    EnvFilter,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};
use vocetta_error::ConfigError;

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Log level filter used when `RUST_LOG` is unset (e.g. "info", "debug")
    pub log_level: String,
    /// Emit JSON-formatted lines for log aggregation
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level; the JSON toggle
/// switches between human-readable and aggregation-friendly output.
///
/// # Errors
///
/// Returns an error if the filter directive cannot be parsed or a global
/// subscriber is already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), ConfigError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| ConfigError::new(format!("Invalid log filter directive: {}", e)))?;

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to install tracing subscriber: {}", e)))?;

    Ok(())
}
