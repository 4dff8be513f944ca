use crate::error::AskError;
use crate::models::{AskRequest, ResultEnvelope};
use crate::startup::AppState;
use axum::{
    body::Bytes,
    debug_handler,
    extract::{rejection::BytesRejection, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// Answer a CORS preflight. The CORS headers themselves come from middleware.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn method_not_allowed() -> AskError {
    AskError::MethodNotAllowed
}

/// Relay a prompt and its chat history to the configured chat provider.
///
/// Mounted as the router fallback, so it answers on any path.
#[debug_handler]
pub async fn ask_gemini(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    if method == Method::OPTIONS {
        return preflight().await.into_response();
    }
    if method != Method::POST {
        return method_not_allowed().await.into_response();
    }

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let err = AskError::UnreadableBody(rejection.status());
            tracing::warn!(error = %rejection.body_text(), "Rejecting unreadable request body");
            return err.into_response();
        }
    };

    match answer(&state, &body).await {
        Ok(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn answer(state: &AppState, body: &[u8]) -> Result<ResultEnvelope, AskError> {
    let request = AskRequest::from_body(body)?;

    let Some(provider) = state.chat_provider.as_deref() else {
        let err = AskError::MissingCredential;
        tracing::error!(error = %err, "Rejecting request: no chat provider configured");
        return Err(err);
    };

    let outcome = match request.history() {
        Ok(history) => provider
            .send_message(history, &request.prompt)
            .await
            .map_err(AskError::from),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(text) => {
            tracing::info!(
                model = %provider.model(),
                text = %text,
                "Received response from Gemini"
            );
            Ok(ResultEnvelope::text(text))
        }
        Err(e) => {
            tracing::error!(
                model = %provider.model(),
                error = %e,
                "Error calling Gemini"
            );
            Err(e)
        }
    }
}
