//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global `tracing` subscriber
//! - Configure log level from config, overridable via `RUST_LOG`
//! - Attach the OpenTelemetry span layer when a tracer is supplied
//!
//! # Design Decisions
//! - JSON format for production, pretty format for development
//! - HTTP client crates used by the exporters are quieted by default

use opentelemetry_sdk::trace::Tracer;
use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::observability::tracing::otel_layer;

/// Error type for logging initialization.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("failed to install subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(level: &str) -> String {
    format!("{level},h2=warn,hyper=warn,hyper_util=warn,reqwest=warn,tower=warn")
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(config: &ObservabilityConfig, tracer: Option<Tracer>) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter(&config.log_level))?,
    };

    let (pretty, json) = match config.log_format {
        LogFormat::Pretty => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .with(tracer.map(otel_layer))
        .try_init()?;

    tracing::info!(
        level = %config.log_level,
        format = ?config.log_format,
        "Logging initialized"
    );
    Ok(())
}

/// Initialize logging for tests (only logs errors).
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("error")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        let directives = default_filter("debug");
        assert!(directives.starts_with("debug,"));
        assert!(EnvFilter::try_new(directives).is_ok());
    }
}
