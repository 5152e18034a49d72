//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Start telemetry → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Termination → Stop accepting → Shut down tracing → Shut down logging → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger termination (once), warn on repeats
//! ```
//!
//! # Design Decisions
//! - Ordered startup: telemetry first, listener last
//! - Ordered shutdown: traces before logs
//! - Exit always runs, even when shutdown fails or times out

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{ProcessExit, Shutdown, ShutdownListener, StdExit, Terminator};
pub use signals::{TerminationSignal, TerminationSignals};
pub use startup::{launch, Application, LifecycleError};
