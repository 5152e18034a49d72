//! Hello-world HTTP service with OpenTelemetry trace and log export.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod telemetry;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::{Application, Shutdown};
pub use telemetry::TelemetryManager;
