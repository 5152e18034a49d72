//! The seam between lifecycle sequencing and the telemetry SDK.

use std::future::{self, Future, IntoFuture};

use futures_util::future::{BoxFuture, FutureExt};

use crate::telemetry::error::BoxError;
use crate::telemetry::record::LogRecord;

/// Completion of a backend's start routine.
///
/// Some SDKs finish starting synchronously, others hand back a future.
/// Both shapes are normalized into one future through [`IntoFuture`], so
/// callers always just `.await` the handle.
pub enum StartHandle {
    /// Start already finished, with this outcome.
    Ready(Result<(), BoxError>),
    /// Start finishes when this future resolves.
    Pending(BoxFuture<'static, Result<(), BoxError>>),
}

impl StartHandle {
    pub fn ready() -> Self {
        StartHandle::Ready(Ok(()))
    }

    pub fn failed(error: impl Into<BoxError>) -> Self {
        StartHandle::Ready(Err(error.into()))
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        StartHandle::Pending(future.boxed())
    }
}

impl IntoFuture for StartHandle {
    type Output = Result<(), BoxError>;
    type IntoFuture = BoxFuture<'static, Result<(), BoxError>>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            StartHandle::Ready(result) => future::ready(result).boxed(),
            StartHandle::Pending(future) => future,
        }
    }
}

/// Tracing + logging export pipeline driven by the telemetry manager.
///
/// Implementations own the exporters; the manager owns ordering and state.
pub trait TelemetryBackend: Send + Sync + 'static {
    /// Bring the exporters up.
    fn start(&self) -> StartHandle;

    /// Flush and stop the trace exporter.
    fn shutdown_tracing(&self) -> BoxFuture<'static, Result<(), BoxError>>;

    /// Flush and stop the log provider.
    fn shutdown_logging(&self) -> BoxFuture<'static, Result<(), BoxError>>;

    /// Hand a record to the log export pipeline. Must not block on export.
    fn emit(&self, record: LogRecord) -> Result<(), BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ready_handle_resolves_immediately() {
        assert!(StartHandle::ready().await.is_ok());

        let err = StartHandle::failed("exporter refused").await.unwrap_err();
        assert_eq!(err.to_string(), "exporter refused");
    }

    #[tokio::test]
    async fn pending_handle_resolves_with_its_future() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = StartHandle::pending(async move {
            rx.await.map_err(|e| Box::new(e) as BoxError)
        });

        let waiter = tokio::spawn(handle.into_future());
        tx.send(()).unwrap();
        assert!(waiter.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn pending_handle_propagates_rejection() {
        let handle = StartHandle::pending(async { Err::<(), BoxError>("late failure".into()) });
        assert_eq!(handle.await.unwrap_err().to_string(), "late failure");
    }
}
