//! Command-line and environment overrides.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::{AppConfig, LogFormat, StartupFailurePolicy};
use crate::config::validation::validate_config;

/// Hello-world HTTP service exporting traces and logs over OTLP.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "hello-otel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "HELLO_OTEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "HELLO_OTEL_PORT")]
    pub port: Option<u16>,

    /// Service name reported to the collector
    #[arg(long, env = "OTEL_SERVICE_NAME")]
    pub service_name: Option<String>,

    /// OTLP/HTTP endpoint for traces
    #[arg(long, env = "OTEL_EXPORTER_OTLP_TRACES_ENDPOINT")]
    pub traces_endpoint: Option<String>,

    /// OTLP/HTTP endpoint for logs
    #[arg(long, env = "OTEL_EXPORTER_OTLP_LOGS_ENDPOINT")]
    pub logs_endpoint: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Console log format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// What to do if telemetry fails to start
    #[arg(long, value_enum)]
    pub on_startup_failure: Option<StartupFailurePolicy>,
}

impl Cli {
    /// Parse CLI arguments and environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Resolve the effective configuration: file (or defaults), then flags.
    pub fn into_config(self) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => AppConfig::default(),
        };

        if let Some(port) = self.port {
            config.listener.set_port(port);
        }
        if let Some(name) = self.service_name {
            config.telemetry.service_name = name;
        }
        if let Some(endpoint) = self.traces_endpoint {
            config.telemetry.traces_endpoint = endpoint;
        }
        if let Some(endpoint) = self.logs_endpoint {
            config.telemetry.logs_endpoint = endpoint;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
        if let Some(policy) = self.on_startup_failure {
            config.lifecycle.on_startup_failure = policy;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "hello-otel",
            "--port",
            "8080",
            "--service-name",
            "greeter",
            "--log-format",
            "json",
            "--on-startup-failure",
            "exit",
        ])
        .unwrap();

        let config = cli.into_config().unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.telemetry.service_name, "greeter");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.lifecycle.on_startup_failure, StartupFailurePolicy::Exit);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let cli = Cli {
            traces_endpoint: Some("collector:4318".into()),
            ..Default::default()
        };

        assert!(matches!(cli.into_config(), Err(ConfigError::Validation(_))));
    }
}
