//! Mock provider for testing.

use super::{ChatProvider, ProviderError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

/// One `send_message` call as seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub history: Vec<Value>,
    pub prompt: String,
}

/// Mock chat provider that answers every message with a canned outcome.
pub struct MockChatProvider {
    outcome: Result<String, ProviderError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockChatProvider {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            outcome: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn send_message(&self, history: &[Value], prompt: &str) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedCall {
                history: history.to_vec(),
                prompt: prompt.to_string(),
            });

        self.outcome.clone()
    }

    fn model(&self) -> &str {
        "mock"
    }
}
