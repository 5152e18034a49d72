//! Shutdown coordination.
//!
//! [`Shutdown`] tells long-running tasks to stop. [`Terminator`] runs the
//! process termination sequence exactly once: stop the listener, shut down
//! telemetry, exit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::telemetry::TelemetryManager;

/// Coordinator for graceful shutdown.
///
/// The signal latches: tasks that subscribe after `trigger()` still see it.
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Get the number of active subscribers (tasks still running).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half of [`Shutdown`].
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Wait until shutdown is triggered.
    pub async fn recv(&mut self) {
        // Err means every coordinator is gone, which also ends the wait.
        let _ = self.rx.wait_for(|triggered| *triggered).await;
    }
}

/// The final step of termination.
pub trait ProcessExit: Send + Sync {
    fn exit(&self, code: i32);
}

/// Exits the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdExit;

impl ProcessExit for StdExit {
    fn exit(&self, code: i32) {
        std::process::exit(code)
    }
}

/// Runs the exit step when dropped, whether termination finished or unwound.
struct ExitGuard<'a> {
    exit: &'a dyn ProcessExit,
    code: i32,
}

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        tracing::info!(code = self.code, "Exiting");
        self.exit.exit(self.code);
    }
}

/// Exactly-once termination sequence.
pub struct Terminator {
    telemetry: Arc<TelemetryManager>,
    shutdown: Shutdown,
    exit: Arc<dyn ProcessExit>,
    deadline: Option<Duration>,
    fired: AtomicBool,
}

impl Terminator {
    pub fn new(
        telemetry: Arc<TelemetryManager>,
        shutdown: Shutdown,
        exit: Arc<dyn ProcessExit>,
    ) -> Self {
        Self {
            telemetry,
            shutdown,
            exit,
            deadline: None,
            fired: AtomicBool::new(false),
        }
    }

    /// Bound each telemetry shutdown stage. `None` waits indefinitely.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Stop the listener, shut down telemetry, then exit with `code`.
    ///
    /// Only the first call does anything; it returns `true`. Shutdown errors
    /// are logged and never prevent the exit step.
    pub async fn terminate(&self, code: i32) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            tracing::warn!("Termination already in progress, ignoring");
            return false;
        }

        let _exit = ExitGuard {
            exit: self.exit.as_ref(),
            code,
        };

        self.shutdown.trigger();

        match self.telemetry.shutdown_within(self.deadline).await {
            Ok(()) => tracing::info!("Telemetry shut down"),
            Err(e) => tracing::error!(error = %e, "Error during shutdown"),
        }
        true
    }
}
