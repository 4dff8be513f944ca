use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness check. Stays 200 without a credential so the process is not
/// restarted for a configuration problem; `upstream` reports it instead.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let upstream = match &state.chat_provider {
        Some(provider) => json!({ "status": "configured", "model": provider.model() }),
        None => json!({ "status": "missing_credential" }),
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "ask-gemini-service",
            "version": env!("CARGO_PKG_VERSION"),
            "upstream": upstream,
        })),
    )
}
