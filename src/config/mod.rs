//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → cli.rs (flag / env overrides, re-validated)
//!     → AppConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use loader::{load_config, ConfigError};
pub use schema::{
    AppConfig, InstrumentationConfig, LifecycleConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, StartupFailurePolicy, TelemetryConfig,
};
pub use validation::{validate_config, ValidationError};
