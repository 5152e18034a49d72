//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace layer, graceful shutdown)
//!     → handlers.rs (GET / → emit log record → "Hello World!")
//!     → Send to client
//! ```
//!
//! Unmatched paths fall through to Axum's default 404.

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
