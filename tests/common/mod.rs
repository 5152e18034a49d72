//! Shared utilities for lifecycle integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::{self, BoxFuture, FutureExt};
use futures_util::stream;
use hello_otel::config::AppConfig;
use hello_otel::lifecycle::{Application, LifecycleError, ProcessExit, TerminationSignal};
use hello_otel::telemetry::{BoxError, LogRecord, StartHandle, TelemetryBackend, TelemetryManager};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Ordered log of everything the fakes observed.
#[derive(Clone, Default)]
pub struct Events(Arc<Mutex<Vec<String>>>);

impl Events {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.snapshot().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

/// Telemetry backend that records every call and can be told to fail.
#[derive(Default)]
pub struct RecordingBackend {
    pub events: Events,
    pub records: Arc<Mutex<Vec<LogRecord>>>,
    pub fail_start: bool,
    pub fail_tracing_shutdown: bool,
    pub fail_emit: bool,
}

impl TelemetryBackend for RecordingBackend {
    fn start(&self) -> StartHandle {
        let events = self.events.clone();
        let fail = self.fail_start;
        StartHandle::pending(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if fail {
                events.push("start_failed");
                Err("collector unavailable".into())
            } else {
                events.push("started");
                Ok(())
            }
        })
    }

    fn shutdown_tracing(&self) -> BoxFuture<'static, Result<(), BoxError>> {
        let events = self.events.clone();
        let fail = self.fail_tracing_shutdown;
        async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            events.push("shutdown_tracing");
            if fail {
                Err("trace exporter rejected shutdown".into())
            } else {
                Ok(())
            }
        }
        .boxed()
    }

    fn shutdown_logging(&self) -> BoxFuture<'static, Result<(), BoxError>> {
        self.events.push("shutdown_logging");
        future::ready(Ok(())).boxed()
    }

    fn emit(&self, record: LogRecord) -> Result<(), BoxError> {
        self.events.push(format!("emit:{}", record.severity()));
        self.records.lock().unwrap().push(record);
        if self.fail_emit {
            Err("log pipeline closed".into())
        } else {
            Ok(())
        }
    }
}

/// Records exit calls instead of exiting.
pub struct RecordingExit(pub Events);

impl ProcessExit for RecordingExit {
    fn exit(&self, code: i32) {
        self.0.push(format!("exit:{code}"));
    }
}

/// A running application under test.
pub struct Harness {
    pub events: Events,
    pub telemetry: Arc<TelemetryManager>,
    pub ready: oneshot::Receiver<SocketAddr>,
    pub signals: Signals,
    pub handle: JoinHandle<Result<(), LifecycleError>>,
}

/// Delivers termination signals to an application under test.
pub struct Signals(mpsc::UnboundedSender<TerminationSignal>);

impl Signals {
    pub fn send(&self, signal: TerminationSignal) {
        self.0.send(signal).unwrap();
    }

    pub fn terminate(&self) {
        self.send(TerminationSignal::Terminate);
    }
}

/// Config bound to an ephemeral local port.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.lifecycle.shutdown_timeout_secs = 5;
    config
}

/// Spawn the application with a recording backend and exit.
pub fn spawn_app(config: AppConfig, backend: RecordingBackend) -> Harness {
    let events = backend.events.clone();
    let telemetry = Arc::new(TelemetryManager::new(backend));
    let (ready_tx, ready) = oneshot::channel();
    let (signals, signals_rx) = mpsc::unbounded_channel();

    let app = Application::new(config, telemetry.clone(), Arc::new(RecordingExit(events.clone())))
        .notify_ready(ready_tx);

    let signals_rx = stream::unfold(signals_rx, |mut rx| async move {
        rx.recv().await.map(|signal| (signal, rx))
    });
    let handle = tokio::spawn(app.run(signals_rx));

    Harness {
        events,
        telemetry,
        ready,
        signals: Signals(signals),
        handle,
    }
}
