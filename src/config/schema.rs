//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// OpenTelemetry export settings.
    pub telemetry: TelemetryConfig,

    /// Console logging settings.
    pub observability: ObservabilityConfig,

    /// Startup and shutdown policy.
    pub lifecycle: LifecycleConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl ListenerConfig {
    /// Replace the port of the bind address, keeping its host.
    ///
    /// Falls back to all interfaces if the current address does not parse.
    pub fn set_port(&mut self, port: u16) {
        let mut addr: SocketAddr = self
            .bind_address
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], port)));
        addr.set_port(port);
        self.bind_address = addr.to_string();
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// OpenTelemetry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// `service.name` resource attribute.
    pub service_name: String,

    /// OTLP/HTTP endpoint for spans.
    pub traces_endpoint: String,

    /// OTLP/HTTP endpoint for log records.
    pub logs_endpoint: String,

    /// Instrumentation scope name used for emitted log records.
    pub logger_name: String,

    /// Extra resource attributes.
    pub resource_attributes: BTreeMap<String, String>,

    /// Which automatic instrumentation to enable.
    pub instrumentation: InstrumentationConfig,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "hello-word-application".to_string(),
            traces_endpoint: "http://localhost:4318/v1/traces".to_string(),
            logs_endpoint: "http://localhost:4318/v1/logs".to_string(),
            logger_name: "example-logger".to_string(),
            resource_attributes: BTreeMap::new(),
            instrumentation: InstrumentationConfig::default(),
        }
    }
}

/// Automatic instrumentation switches.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InstrumentationConfig {
    /// Open a span per HTTP request.
    pub http: bool,

    /// Install the W3C trace-context propagator.
    pub trace_context_propagation: bool,
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            http: true,
            trace_context_propagation: true,
        }
    }
}

/// Console log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line, for production.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Console output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// What to do when telemetry fails to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StartupFailurePolicy {
    /// Stay alive without a listener until terminated.
    #[default]
    Stay,
    /// Run the termination sequence and exit with status 1.
    Exit,
}

/// Lifecycle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Behavior when telemetry startup fails.
    pub on_startup_failure: StartupFailurePolicy,

    /// Upper bound on telemetry shutdown in seconds. 0 waits indefinitely.
    pub shutdown_timeout_secs: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            on_startup_failure: StartupFailurePolicy::Stay,
            shutdown_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_local_collector_setup() {
        let config = AppConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.telemetry.service_name, "hello-word-application");
        assert_eq!(config.telemetry.traces_endpoint, "http://localhost:4318/v1/traces");
        assert_eq!(config.telemetry.logs_endpoint, "http://localhost:4318/v1/logs");
        assert_eq!(config.lifecycle.on_startup_failure, StartupFailurePolicy::Stay);
    }

    #[test]
    fn set_port_keeps_host() {
        let mut listener = ListenerConfig {
            bind_address: "127.0.0.1:3000".into(),
        };
        listener.set_port(8080);
        assert_eq!(listener.bind_address, "127.0.0.1:8080");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [telemetry]
            service_name = "checkout"

            [lifecycle]
            on_startup_failure = "exit"
            "#,
        )
        .unwrap();

        assert_eq!(config.telemetry.service_name, "checkout");
        assert_eq!(config.telemetry.logger_name, "example-logger");
        assert_eq!(config.lifecycle.on_startup_failure, StartupFailurePolicy::Exit);
        assert_eq!(config.lifecycle.shutdown_timeout_secs, 30);
    }
}
