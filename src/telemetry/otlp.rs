//! OTLP/HTTP backend built on the OpenTelemetry SDK.
//!
//! Providers and exporters are built from configuration up front, which
//! makes no network calls; `start()` registers the tracer provider and the
//! W3C propagator globally so instrumentation can find them.

use futures_util::future::{BoxFuture, FutureExt};
use opentelemetry::logs::{AnyValue, LogRecord as _, Logger as _, LoggerProvider as _};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::{LogExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::logs::{SdkLogger, SdkLoggerProvider};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{SdkTracerProvider, Tracer};
use opentelemetry_sdk::Resource;

use crate::config::TelemetryConfig;
use crate::telemetry::backend::{StartHandle, TelemetryBackend};
use crate::telemetry::error::{BoxError, TelemetryError};
use crate::telemetry::record::{LogRecord, Severity};

/// Telemetry backend exporting spans and log records to an OTLP collector.
pub struct OtlpBackend {
    tracer_provider: SdkTracerProvider,
    logger_provider: SdkLoggerProvider,
    logger: SdkLogger,
    propagate_trace_context: bool,
}

impl OtlpBackend {
    /// Build exporters and providers for the given configuration.
    pub fn new(config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        let resource = build_resource(config);

        let span_exporter = SpanExporter::builder()
            .with_http()
            .with_endpoint(config.traces_endpoint.as_str())
            .build()
            .map_err(|e| TelemetryError::Exporter {
                signal: "trace",
                source: Box::new(e),
            })?;

        let log_exporter = LogExporter::builder()
            .with_http()
            .with_endpoint(config.logs_endpoint.as_str())
            .build()
            .map_err(|e| TelemetryError::Exporter {
                signal: "log",
                source: Box::new(e),
            })?;

        let tracer_provider = SdkTracerProvider::builder()
            .with_resource(resource.clone())
            .with_batch_exporter(span_exporter)
            .build();

        let logger_provider = SdkLoggerProvider::builder()
            .with_resource(resource)
            .with_batch_exporter(log_exporter)
            .build();
        let logger = logger_provider.logger(config.logger_name.clone());

        tracing::debug!(
            service_name = %config.service_name,
            traces_endpoint = %config.traces_endpoint,
            logs_endpoint = %config.logs_endpoint,
            "OTLP exporters configured"
        );

        Ok(Self {
            tracer_provider,
            logger_provider,
            logger,
            propagate_trace_context: config.instrumentation.trace_context_propagation,
        })
    }

    /// Tracer for the `tracing-opentelemetry` layer.
    pub fn tracer(&self, name: &'static str) -> Tracer {
        self.tracer_provider.tracer(name)
    }
}

impl TelemetryBackend for OtlpBackend {
    fn start(&self) -> StartHandle {
        if self.propagate_trace_context {
            global::set_text_map_propagator(TraceContextPropagator::new());
        }
        global::set_tracer_provider(self.tracer_provider.clone());
        StartHandle::ready()
    }

    fn shutdown_tracing(&self) -> BoxFuture<'static, Result<(), BoxError>> {
        let provider = self.tracer_provider.clone();
        async move {
            tokio::task::spawn_blocking(move || provider.shutdown())
                .await?
                .map_err(BoxError::from)
        }
        .boxed()
    }

    fn shutdown_logging(&self) -> BoxFuture<'static, Result<(), BoxError>> {
        let provider = self.logger_provider.clone();
        async move {
            tokio::task::spawn_blocking(move || provider.shutdown())
                .await?
                .map_err(BoxError::from)
        }
        .boxed()
    }

    fn emit(&self, record: LogRecord) -> Result<(), BoxError> {
        let (timestamp, severity, body) = record.into_parts();

        let mut otel_record = self.logger.create_log_record();
        otel_record.set_timestamp(timestamp);
        otel_record.set_severity_text(severity.as_str());
        otel_record.set_severity_number(otel_severity(severity));
        otel_record.set_body(AnyValue::from(body));
        self.logger.emit(otel_record);
        Ok(())
    }
}

fn build_resource(config: &TelemetryConfig) -> Resource {
    let mut attributes = vec![KeyValue::new(
        "service.version",
        env!("CARGO_PKG_VERSION"),
    )];
    attributes.extend(
        config
            .resource_attributes
            .iter()
            .map(|(key, value)| KeyValue::new(key.clone(), value.clone())),
    );

    Resource::builder()
        .with_service_name(config.service_name.clone())
        .with_attributes(attributes)
        .build()
}

fn otel_severity(severity: Severity) -> opentelemetry::logs::Severity {
    use opentelemetry::logs::Severity as Otel;

    match severity {
        Severity::Trace => Otel::Trace,
        Severity::Debug => Otel::Debug,
        Severity::Info => Otel::Info,
        Severity::Warn => Otel::Warn,
        Severity::Error => Otel::Error,
        Severity::Fatal => Otel::Fatal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_numbers_follow_otel() {
        assert_eq!(otel_severity(Severity::Info) as i32, 9);
        assert_eq!(otel_severity(Severity::Error) as i32, 17);
    }

    #[test]
    fn resource_carries_service_name_and_extras() {
        let mut config = TelemetryConfig::default();
        config
            .resource_attributes
            .insert("deployment.environment".into(), "test".into());

        let resource = build_resource(&config);
        let lookup = |key: &str| {
            resource
                .iter()
                .find(|(k, _)| k.as_str() == key)
                .map(|(_, v)| v.to_string())
        };

        assert_eq!(lookup("service.name"), Some("hello-word-application".into()));
        assert_eq!(lookup("deployment.environment"), Some("test".into()));
        assert_eq!(lookup("service.version"), Some(env!("CARGO_PKG_VERSION").into()));
    }

    #[test]
    fn emits_through_the_configured_logger() {
        let mut config = TelemetryConfig::default();
        config.logger_name = "request-logger".into();

        let backend = OtlpBackend::new(&config).unwrap();

        for _ in 0..3 {
            let record = LogRecord::new(Severity::Info, "Received request on root path");
            assert!(backend.emit(record).is_ok());
        }
    }
}
