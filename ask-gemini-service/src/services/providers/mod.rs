//! Chat provider abstraction and implementations.
//!
//! The handler only needs "send history + prompt, receive text or error";
//! everything vendor specific lives behind [`ChatProvider`].

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Prompt blocked: {0}")]
    PromptBlocked(String),

    #[error("Candidate stopped early: {0}")]
    BadFinishReason(String),
}

/// A chat-capable text generation backend.
///
/// `history` holds prior turns exactly as the caller supplied them; the new
/// prompt is sent as the latest user turn.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn send_message(&self, history: &[Value], prompt: &str) -> Result<String, ProviderError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
