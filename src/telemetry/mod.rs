//! Telemetry subsystem.
//!
//! # Data Flow
//! ```text
//! TelemetryManager (manager.rs)
//!     start()     → backend.start() → Running
//!     emit()      → LogRecord (record.rs) → backend.emit()
//!     shutdown()  → backend.shutdown_tracing() → backend.shutdown_logging()
//!
//! TelemetryBackend (backend.rs)
//!     → OtlpBackend (otlp.rs): OTLP/HTTP span + log exporters
//! ```
//!
//! # Design Decisions
//! - One explicitly owned manager, no global singleton
//! - Lifecycle state is a single atomic; transitions are compare-and-swap
//! - Emission is fire-and-forget and never surfaces errors to callers

pub mod backend;
pub mod error;
pub mod manager;
pub mod otlp;
pub mod record;
pub mod state;

pub use backend::{StartHandle, TelemetryBackend};
pub use error::{BoxError, ShutdownFailure, ShutdownStage, TelemetryError};
pub use manager::TelemetryManager;
pub use otlp::OtlpBackend;
pub use record::{LogRecord, Severity};
pub use state::TelemetryState;
