//! Gemini chat provider.
//!
//! Sends the caller's history plus the new prompt to the `generateContent`
//! REST method and reads back the first candidate's text.

use super::{ChatProvider, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

/// Public Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Finish reasons that make a candidate unusable.
const BAD_FINISH_REASONS: &[&str] = &["SAFETY", "RECITATION", "LANGUAGE"];

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

/// Gemini chat provider.
pub struct GeminiChatProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiChatProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// A model given as a resource path (`models/...`, `tunedModels/...`) is
    /// used as is; a bare id goes under `models/`.
    fn api_url(&self, method: &str) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        let model = self.config.model.trim_start_matches('/');
        if model.contains('/') {
            format!("{}/{}:{}", base, model, method)
        } else {
            format!("{}/models/{}:{}", base, model, method)
        }
    }
}

#[async_trait]
impl ChatProvider for GeminiChatProvider {
    async fn send_message(&self, history: &[Value], prompt: &str) -> Result<String, ProviderError> {
        let request = GenerateContentRequest::new(history, prompt);

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            history_len = history.len(),
            "Sending chat message to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url("generateContent"))
            .header("x-goog-api-key", self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let api_response: GenerateContentResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        api_response.text()
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    /// Prior turns are forwarded untouched, so they stay as raw JSON.
    contents: Vec<Value>,
}

impl GenerateContentRequest {
    fn new(history: &[Value], prompt: &str) -> Self {
        let mut contents = Vec::with_capacity(history.len() + 1);
        contents.extend_from_slice(history);
        contents.push(json!({
            "role": "user",
            "parts": [{ "text": prompt }],
        }));
        Self { contents }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
    #[serde(default)]
    finish_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, with all its text parts joined.
    ///
    /// No candidates and no prompt feedback yields an empty string.
    fn text(&self) -> Result<String, ProviderError> {
        if let Some(candidate) = self.candidates.first() {
            if self.candidates.len() > 1 {
                tracing::warn!(
                    candidates = self.candidates.len(),
                    "Multiple candidates returned, using the first"
                );
            }

            if let Some(reason) = candidate
                .finish_reason
                .as_deref()
                .filter(|r| BAD_FINISH_REASONS.contains(r))
            {
                let detail = match &candidate.finish_message {
                    Some(message) => format!("{}: {}", reason, message),
                    None => reason.to_string(),
                };
                return Err(ProviderError::BadFinishReason(detail));
            }

            let text = candidate
                .content
                .iter()
                .flat_map(|c| c.parts.iter())
                .filter_map(|p| p.text.as_deref())
                .collect::<String>();
            return Ok(text);
        }

        if let Some(feedback) = &self.prompt_feedback {
            let reason = feedback.block_reason.as_deref().unwrap_or("UNKNOWN");
            let detail = match &feedback.block_reason_message {
                Some(message) => format!("{}: {}", reason, message),
                None => reason.to_string(),
            };
            return Err(ProviderError::PromptBlocked(detail));
        }

        Ok(String::new())
    }
}
