//! Startup orchestration.
//!
//! # Responsibilities
//! - Start telemetry before anything else
//! - Bind the listener and begin accepting traffic only once telemetry runs
//! - Apply the startup-failure policy
//! - Hand termination to the [`Terminator`] on the first termination signal,
//!   and report later ones while it runs
//!
//! # Design Decisions
//! - Listeners start last (traffic only when observable)
//! - The terminator owns process exit; `run` only waits for it

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinError;

use crate::config::{AppConfig, StartupFailurePolicy};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::{ProcessExit, Shutdown, Terminator};
use crate::lifecycle::signals::TerminationSignal;
use crate::telemetry::{TelemetryError, TelemetryManager};

/// Exit status used when startup or serving fails.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Error type for the application lifecycle.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server failed: {0}")]
    Serve(#[source] std::io::Error),

    #[error("termination task failed: {0}")]
    Task(#[from] JoinError),
}

/// Start telemetry, then run `serve`.
///
/// `serve` is never called if telemetry fails to start.
pub async fn launch<F, Fut>(telemetry: &TelemetryManager, serve: F) -> Result<Fut::Output, TelemetryError>
where
    F: FnOnce() -> Fut,
    Fut: Future,
{
    telemetry.start().await?;
    Ok(serve().await)
}

/// The whole process lifecycle: telemetry, HTTP server, termination.
pub struct Application {
    config: AppConfig,
    telemetry: Arc<TelemetryManager>,
    exit: Arc<dyn ProcessExit>,
    ready: Option<oneshot::Sender<SocketAddr>>,
}

impl Application {
    pub fn new(config: AppConfig, telemetry: Arc<TelemetryManager>, exit: Arc<dyn ProcessExit>) -> Self {
        Self {
            config,
            telemetry,
            exit,
            ready: None,
        }
    }

    /// Receive the bound address once the listener is up.
    pub fn notify_ready(mut self, tx: oneshot::Sender<SocketAddr>) -> Self {
        self.ready = Some(tx);
        self
    }

    /// Run until the first item of `signals` has been handled by the
    /// termination sequence.
    ///
    /// A stream that ends without yielding never requests termination.
    pub async fn run<S>(self, signals: S) -> Result<(), LifecycleError>
    where
        S: Stream<Item = TerminationSignal> + Send + 'static,
    {
        let Application {
            config,
            telemetry,
            exit,
            ready,
        } = self;

        let shutdown = Shutdown::new();
        let deadline = match config.lifecycle.shutdown_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        let terminator = Arc::new(
            Terminator::new(telemetry.clone(), shutdown.clone(), exit).with_deadline(deadline),
        );

        let watcher = tokio::spawn(watch_signals(Box::pin(signals), terminator.clone()));

        let served = launch(&telemetry, || {
            serve(&config, telemetry.clone(), shutdown.clone(), ready)
        })
        .await;

        match served {
            Ok(Ok(())) => {
                // Stopped by the terminator; let it finish.
                watcher.await?;
                Ok(())
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "HTTP server failed");
                watcher.abort();
                terminator.terminate(FAILURE_EXIT_CODE).await;
                Err(e)
            }
            Err(e) => match config.lifecycle.on_startup_failure {
                StartupFailurePolicy::Stay => {
                    tracing::warn!("Telemetry failed to start, not listening until terminated");
                    watcher.await?;
                    Err(e.into())
                }
                StartupFailurePolicy::Exit => {
                    watcher.abort();
                    terminator.terminate(FAILURE_EXIT_CODE).await;
                    Err(e.into())
                }
            },
        }
    }
}

async fn watch_signals<S>(mut signals: S, terminator: Arc<Terminator>)
where
    S: Stream<Item = TerminationSignal> + Unpin,
{
    let Some(signal) = signals.next().await else {
        return std::future::pending().await;
    };
    tracing::info!(%signal, "Received termination signal, initiating shutdown");

    let repeats = async {
        while let Some(signal) = signals.next().await {
            tracing::warn!(%signal, "Received termination signal during shutdown");
            terminator.terminate(0).await;
        }
        std::future::pending::<()>().await
    };

    // The first signal must claim the terminator before any repeat.
    tokio::select! {
        biased;
        _ = terminator.terminate(0) => {}
        _ = repeats => {}
    }
}

async fn serve(
    config: &AppConfig,
    telemetry: Arc<TelemetryManager>,
    shutdown: Shutdown,
    ready: Option<oneshot::Sender<SocketAddr>>,
) -> Result<(), LifecycleError> {
    let address = config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| LifecycleError::Bind { address, source })?;

    if let Some(tx) = ready {
        if let Ok(addr) = listener.local_addr() {
            let _ = tx.send(addr);
        }
    }

    HttpServer::new(config, telemetry)
        .run(listener, shutdown.subscribe())
        .await
        .map_err(LifecycleError::Serve)
}
