//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the root handler
//! - Wire up the request trace layer when HTTP instrumentation is on
//! - Serve on a bound listener until the shutdown signal fires

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::http::handlers;
use crate::lifecycle::ShutdownListener;
use crate::telemetry::TelemetryManager;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub telemetry: Arc<TelemetryManager>,
}

/// HTTP server for the hello-world route.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &AppConfig, telemetry: Arc<TelemetryManager>) -> Self {
        let state = AppState { telemetry };
        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let router = Router::new()
            .route("/", get(handlers::root))
            .with_state(state);

        if config.telemetry.instrumentation.http {
            router.layer(TraceLayer::new_for_http())
        } else {
            router
        }
    }

    /// The router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Server running on port {}", addr.port());

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received, stopping HTTP server");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
