//! Telemetry lifecycle manager.
//!
//! Owns the [`TelemetryState`] of one backend and enforces the ordering the
//! rest of the process relies on:
//! - `start()` resolves only once the backend is running
//! - `shutdown()` stops tracing before logging and always attempts both
//! - `emit()` never fails the caller, and keeps forwarding while tracing
//!   winds down

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;

use crate::telemetry::backend::TelemetryBackend;
use crate::telemetry::error::{BoxError, ShutdownFailure, ShutdownStage, TelemetryError};
use crate::telemetry::record::{LogRecord, Severity};
use crate::telemetry::state::TelemetryState;

/// Single owner of the telemetry subsystem.
///
/// Constructed once at process start and shared via `Arc` with the HTTP
/// server state and the terminator.
pub struct TelemetryManager {
    backend: Arc<dyn TelemetryBackend>,
    state: AtomicU8,
    /// Open from `Running` until the logging stage of shutdown begins.
    logs_open: AtomicBool,
}

impl TelemetryManager {
    pub fn new<B: TelemetryBackend>(backend: B) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    pub fn from_arc(backend: Arc<dyn TelemetryBackend>) -> Self {
        Self {
            backend,
            state: AtomicU8::new(TelemetryState::NotStarted as u8),
            logs_open: AtomicBool::new(false),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TelemetryState {
        TelemetryState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.state() == TelemetryState::Running
    }

    fn transition(&self, from: TelemetryState, to: TelemetryState) -> Result<(), TelemetryError> {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|found| TelemetryError::InvalidState {
                expected: from,
                found: TelemetryState::from_u8(found),
            })
    }

    /// Start the exporters.
    ///
    /// Resolves once the state is `Running`. On failure the state stays
    /// `Starting`.
    pub async fn start(&self) -> Result<(), TelemetryError> {
        self.transition(TelemetryState::NotStarted, TelemetryState::Starting)?;
        tracing::debug!("Starting OpenTelemetry SDK");

        match self.backend.start().await {
            Ok(()) => {
                self.transition(TelemetryState::Starting, TelemetryState::Running)?;
                self.logs_open.store(true, Ordering::Release);
                tracing::info!("OpenTelemetry SDK started");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error starting OpenTelemetry SDK");
                Err(TelemetryError::Startup(e))
            }
        }
    }

    /// Shut down tracing, then logging, waiting as long as each takes.
    pub async fn shutdown(&self) -> Result<(), TelemetryError> {
        self.shutdown_within(None).await
    }

    /// Shut down tracing, then logging.
    ///
    /// Both steps are attempted even if the first fails or overruns
    /// `stage_timeout`; failures are collected into
    /// [`TelemetryError::Shutdown`]. Each stage gets the full timeout.
    /// Calling this again after shutdown began is a no-op.
    pub async fn shutdown_within(&self, stage_timeout: Option<Duration>) -> Result<(), TelemetryError> {
        if let Err(e) = self.transition(TelemetryState::Running, TelemetryState::ShuttingDown) {
            let found = self.state();
            if found.is_terminal() {
                tracing::debug!(state = %found, "Telemetry shutdown already requested");
                return Ok(());
            }
            return Err(e);
        }

        let mut failures = Vec::new();

        match run_stage(self.backend.shutdown_tracing(), stage_timeout).await {
            Ok(()) => tracing::info!("Tracing terminated"),
            Err(source) => {
                tracing::warn!(error = %source, "Error shutting down tracing");
                failures.push(ShutdownFailure {
                    stage: ShutdownStage::Tracing,
                    source,
                });
            }
        }

        self.logs_open.store(false, Ordering::Release);

        match run_stage(self.backend.shutdown_logging(), stage_timeout).await {
            Ok(()) => tracing::info!("Logging terminated"),
            Err(source) => {
                tracing::warn!(error = %source, "Error shutting down logging");
                failures.push(ShutdownFailure {
                    stage: ShutdownStage::Logging,
                    source,
                });
            }
        }

        self.state
            .store(TelemetryState::Stopped as u8, Ordering::Release);

        if failures.is_empty() {
            Ok(())
        } else {
            Err(TelemetryError::Shutdown(failures))
        }
    }

    /// Emit a log record, best effort.
    ///
    /// Records are forwarded while `Running` and during tracing shutdown;
    /// anything else is dropped.
    pub fn emit(&self, severity: Severity, message: impl Into<String>) {
        if !self.logs_open.load(Ordering::Acquire) {
            tracing::debug!(state = %self.state(), "Log pipeline closed, dropping log record");
            return;
        }

        if let Err(e) = self.backend.emit(LogRecord::new(severity, message)) {
            tracing::debug!(error = %e, "Failed to emit log record");
        }
    }
}

async fn run_stage(
    stage: BoxFuture<'static, Result<(), BoxError>>,
    timeout: Option<Duration>,
) -> Result<(), BoxError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, stage)
            .await
            .unwrap_or_else(|_| Err(TelemetryError::ShutdownTimeout(limit).into())),
        None => stage.await,
    }
}

impl std::fmt::Debug for TelemetryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryManager")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
