//! Distributed tracing support.
//!
//! Bridges `tracing` spans (including the per-request spans opened by the
//! HTTP trace layer) into the OpenTelemetry tracer of the OTLP backend.

use opentelemetry_sdk::trace::Tracer;
use tracing::Subscriber;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::registry::LookupSpan;

/// Instrumentation scope name for spans produced by this service.
pub const TRACER_NAME: &str = "hello-otel";

/// Build the `tracing` → OpenTelemetry span layer.
pub fn otel_layer<S>(tracer: Tracer) -> OpenTelemetryLayer<S, Tracer>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    tracing_opentelemetry::layer()
        .with_tracer(tracer)
        .with_tracked_inactivity(false)
}
