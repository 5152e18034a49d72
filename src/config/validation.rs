//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the bind address and collector URLs
//! - Reject empty identifiers
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.listener.bind_address.parse::<SocketAddr>() {
        errors.push(ValidationError {
            field: "listener.bind_address",
            message: format!("'{}' is not a socket address: {}", config.listener.bind_address, e),
        });
    }

    check_endpoint(&mut errors, "telemetry.traces_endpoint", &config.telemetry.traces_endpoint);
    check_endpoint(&mut errors, "telemetry.logs_endpoint", &config.telemetry.logs_endpoint);

    if config.telemetry.service_name.trim().is_empty() {
        errors.push(ValidationError {
            field: "telemetry.service_name",
            message: "must not be empty".to_string(),
        });
    }

    if config.telemetry.logger_name.trim().is_empty() {
        errors.push(ValidationError {
            field: "telemetry.logger_name",
            message: "must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_endpoint(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError {
            field,
            message: format!("unsupported scheme '{}', expected http or https", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError {
            field,
            message: format!("'{}' is not a URL: {}", value, e),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "localhost".into();
        config.telemetry.traces_endpoint = "grpc://collector:4317".into();
        config.telemetry.logs_endpoint = "not a url".into();
        config.telemetry.service_name = "  ".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();

        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "telemetry.traces_endpoint",
                "telemetry.logs_endpoint",
                "telemetry.service_name",
            ]
        );
        assert!(errors[1].message.contains("grpc"));
    }

    #[test]
    fn error_names_the_field() {
        let mut config = AppConfig::default();
        config.telemetry.logger_name = String::new();

        let errors = validate_config(&config).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "telemetry.logger_name: must not be empty");
    }
}
