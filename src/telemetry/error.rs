//! Telemetry error types.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::telemetry::state::TelemetryState;

/// Boxed error returned by telemetry backends.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which exporter a shutdown step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownStage {
    Tracing,
    Logging,
}

impl fmt::Display for ShutdownStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownStage::Tracing => f.write_str("tracing"),
            ShutdownStage::Logging => f.write_str("logging"),
        }
    }
}

/// A single failed shutdown step.
#[derive(Debug)]
pub struct ShutdownFailure {
    pub stage: ShutdownStage,
    pub source: BoxError,
}

impl fmt::Display for ShutdownFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage, self.source)
    }
}

/// Errors raised by the telemetry lifecycle.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The backend's start routine failed or rejected.
    #[error("telemetry subsystem failed to start: {0}")]
    Startup(#[source] BoxError),

    /// One or both exporters failed to shut down.
    #[error("telemetry shutdown failed: {}", join_failures(.0))]
    Shutdown(Vec<ShutdownFailure>),

    /// Shutdown did not finish within the configured deadline.
    #[error("telemetry shutdown timed out after {0:?}")]
    ShutdownTimeout(Duration),

    /// An operation was requested from the wrong lifecycle state.
    #[error("telemetry is {found}, expected {expected}")]
    InvalidState {
        expected: TelemetryState,
        found: TelemetryState,
    },

    /// An OTLP exporter could not be built from configuration.
    #[error("failed to build {signal} exporter: {source}")]
    Exporter {
        signal: &'static str,
        #[source]
        source: BoxError,
    },
}

impl TelemetryError {
    /// Failed shutdown steps, if this is a shutdown error.
    pub fn shutdown_failures(&self) -> &[ShutdownFailure] {
        match self {
            TelemetryError::Shutdown(failures) => failures,
            _ => &[],
        }
    }
}

fn join_failures(failures: &[ShutdownFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
