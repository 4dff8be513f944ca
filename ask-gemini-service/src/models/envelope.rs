//! JSON envelopes shaped like a callable cloud function:
//! `{data: ...}` in, `{result: ...}` or `{error: ...}` out.

use crate::error::AskError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw request body. Every field is optional so that a shape mismatch turns
/// into a validation failure rather than a deserialization one.
#[derive(Debug, Default, Deserialize)]
pub struct CallableRequest {
    #[serde(default)]
    pub data: Option<CallablePayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CallablePayload {
    #[serde(default)]
    pub prompt: Option<Value>,
    #[serde(default)]
    pub history: Option<Value>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct AskRequest {
    /// Non-blank, forwarded as sent (not trimmed).
    pub prompt: String,
    history: Option<Value>,
}

impl AskRequest {
    /// Parse and validate a request body.
    ///
    /// Bodies that are not JSON, or lack a `data` object, are reported the
    /// same way as a missing prompt.
    pub fn from_body(body: &[u8]) -> Result<Self, AskError> {
        let request: CallableRequest = serde_json::from_slice(body).map_err(|e| {
            tracing::debug!(error = %e, "Request body is not a callable envelope");
            AskError::InvalidPrompt
        })?;

        let payload = request.data.ok_or(AskError::InvalidPrompt)?;

        match payload.prompt {
            Some(Value::String(prompt)) if !prompt.trim().is_empty() => Ok(AskRequest {
                prompt,
                history: payload.history,
            }),
            _ => Err(AskError::InvalidPrompt),
        }
    }

    /// Prior turns to replay before the prompt.
    ///
    /// A falsy `history` (absent, `null`, `false`, `0`, `""`) means no prior
    /// turns. Array entries are passed through unchecked; any other truthy
    /// value cannot start a chat.
    pub fn history(&self) -> Result<&[Value], AskError> {
        match &self.history {
            Some(Value::Array(turns)) => Ok(turns),
            Some(value) if is_truthy(value) => Err(AskError::InvalidHistory),
            _ => Ok(&[]),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `{"result": {"text": ...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub result: TextResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextResult {
    pub text: String,
}

impl ResultEnvelope {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            result: TextResult { text: text.into() },
        }
    }
}

/// `{"error": {"message": ...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorEnvelope {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
            },
        }
    }
}
