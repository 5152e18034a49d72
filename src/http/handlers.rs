//! Request handlers.

use axum::extract::State;

use crate::http::server::AppState;
use crate::telemetry::Severity;

/// Body returned by `GET /`.
pub const ROOT_RESPONSE: &str = "Hello World!";

/// Log record body emitted for every `GET /`.
pub const ROOT_LOG_MESSAGE: &str = "Received request on root path";

/// `GET /`: emit one log record, then answer with a fixed body.
///
/// Emission is fire-and-forget; the response does not depend on it.
pub async fn root(State(state): State<AppState>) -> &'static str {
    state.telemetry.emit(Severity::Info, ROOT_LOG_MESSAGE);
    ROOT_RESPONSE
}
