use crate::models::ErrorEnvelope;
use crate::services::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub const INVALID_PROMPT_MESSAGE: &str =
    "The function must be called with a non-empty 'prompt' string.";
pub const MISSING_CREDENTIAL_MESSAGE: &str = "The server is missing its API configuration.";
pub const UNREADABLE_BODY_MESSAGE: &str = "The request body could not be read.";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "An error occurred while communicating with the AI.";

/// Every way an ask request can end without generated text.
///
/// Server-side variants render a fixed message; their detail only goes to
/// the log.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AskError {
    #[error("prompt is missing, not a string, or blank")]
    InvalidPrompt,

    #[error("request body could not be read ({0})")]
    UnreadableBody(StatusCode),

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("GEMINI_API_KEY secret not set in the environment")]
    MissingCredential,

    #[error("history is not a sequence of turns")]
    InvalidHistory,

    #[error("upstream call failed: {0}")]
    Upstream(#[from] ProviderError),
}

impl AskError {
    pub fn status(&self) -> StatusCode {
        match self {
            AskError::InvalidPrompt => StatusCode::BAD_REQUEST,
            AskError::UnreadableBody(status) => *status,
            AskError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AskError::MissingCredential | AskError::InvalidHistory | AskError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AskError {
    fn into_response(self) -> Response {
        let message = match &self {
            AskError::MethodNotAllowed => {
                return (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response();
            }
            AskError::InvalidPrompt => INVALID_PROMPT_MESSAGE,
            AskError::UnreadableBody(_) => UNREADABLE_BODY_MESSAGE,
            AskError::MissingCredential => MISSING_CREDENTIAL_MESSAGE,
            AskError::InvalidHistory | AskError::Upstream(_) => UPSTREAM_FAILURE_MESSAGE,
        };

        (self.status(), Json(ErrorEnvelope::message(message))).into_response()
    }
}
