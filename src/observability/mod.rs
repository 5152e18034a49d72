//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured console log events)
//!     → tracing.rs (spans bridged to the OTLP tracer)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → OpenTelemetry collector (spans, via the telemetry backend)
//! ```
//!
//! Explicit log records for the collector go through
//! `telemetry::TelemetryManager::emit`, not through this module.

pub mod logging;
pub mod tracing;

pub use logging::{init_logging, init_test_logging, LoggingError};
