//! OS signal handling.
//!
//! # Responsibilities
//! - Register SIGTERM and SIGINT (Ctrl+C) handlers
//! - Report every signal asking the process to terminate, including
//!   repeats during shutdown
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - A handler that cannot be installed never fires, rather than firing
//!   spuriously

use std::fmt;

use futures_util::stream::{self, Stream};

/// A signal asking the process to terminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    /// SIGTERM.
    Terminate,
    /// SIGINT / Ctrl+C.
    Interrupt,
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationSignal::Terminate => f.write_str("SIGTERM"),
            TerminationSignal::Interrupt => f.write_str("SIGINT"),
        }
    }
}

/// Termination signals delivered as they arrive.
///
/// Handlers stay installed for the life of the process, so signals sent
/// while shutdown is already running are still observed.
pub struct TerminationSignals {
    #[cfg(unix)]
    sigterm: Option<tokio::signal::unix::Signal>,
}

impl TerminationSignals {
    /// Install the SIGTERM handler. Ctrl+C is registered on first `recv`.
    pub fn install() -> Self {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let sigterm = match signal(SignalKind::terminate()) {
                Ok(sigterm) => Some(sigterm),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    None
                }
            };
            Self { sigterm }
        }

        #[cfg(not(unix))]
        {
            Self {}
        }
    }

    /// Wait for the next termination signal.
    pub async fn recv(&mut self) -> TerminationSignal {
        #[cfg(unix)]
        {
            if let Some(sigterm) = self.sigterm.as_mut() {
                return tokio::select! {
                    _ = interrupt() => TerminationSignal::Interrupt,
                    _ = sigterm.recv() => TerminationSignal::Terminate,
                };
            }
        }

        interrupt().await;
        TerminationSignal::Interrupt
    }

    /// Every signal received from now on, as a stream.
    pub fn into_stream(self) -> impl Stream<Item = TerminationSignal> + Send + 'static {
        stream::unfold(self, |mut signals| async move {
            let signal = signals.recv().await;
            Some((signal, signals))
        })
    }
}

async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
