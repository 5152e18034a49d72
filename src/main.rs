//! hello-otel: a hello-world HTTP service exporting traces and logs over OTLP.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                  hello-otel                  │
//!                        │                                              │
//!   1. start()           │  ┌───────────────┐     ┌──────────────────┐  │
//!   ─────────────────────┼─▶│  telemetry    │────▶│ OTLP exporters   │──┼──▶ Collector
//!                        │  │  manager      │     │ (traces, logs)   │  │    :4318
//!                        │  └───────▲───────┘     └──────────────────┘  │
//!                        │          │ emit()                            │
//!   2. GET /             │  ┌───────┴───────┐                           │
//!   ─────────────────────┼─▶│ http server   │── "Hello World!"          │
//!                        │  └───────────────┘                           │
//!                        │                                              │
//!   3. SIGTERM           │  ┌───────────────┐                           │
//!   ─────────────────────┼─▶│ terminator    │── stop → traces → logs    │
//!                        │  └───────────────┘   → exit(0)               │
//!                        └──────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```bash
//! hello-otel --port 3000 --traces-endpoint http://localhost:4318/v1/traces
//! ```

use std::sync::Arc;

use hello_otel::config::Cli;
use hello_otel::lifecycle::{Application, StdExit, TerminationSignals};
use hello_otel::observability::init_logging;
use hello_otel::observability::tracing::TRACER_NAME;
use hello_otel::telemetry::{OtlpBackend, TelemetryManager};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse_args().into_config()?;

    // Exporters are built before the runtime exists; their HTTP clients are blocking.
    let backend = OtlpBackend::new(&config.telemetry)?;
    init_logging(&config.observability, Some(backend.tracer(TRACER_NAME)))?;

    tracing::info!("hello-otel v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        service_name = %config.telemetry.service_name,
        traces_endpoint = %config.telemetry.traces_endpoint,
        logs_endpoint = %config.telemetry.logs_endpoint,
        on_startup_failure = ?config.lifecycle.on_startup_failure,
        "Configuration loaded"
    );

    // Single-threaded event loop.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let telemetry = Arc::new(TelemetryManager::new(backend));
        let app = Application::new(config, telemetry, Arc::new(StdExit));

        app.run(TerminationSignals::install().into_stream()).await
    })?;

    Ok(())
}
