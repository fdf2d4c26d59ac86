//! Chat-completion access.
//!
//! Everything that talks to the language model goes through the
//! `ChatCompletion` trait so services can be exercised with a scripted fake.

mod openai;

pub use openai::OpenAiClient;

use crate::error::ApiError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("LLM API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid LLM response: {0}")]
    InvalidResponse(String),

    #[error("LLM API key is not configured")]
    NotConfigured,
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

/// One system + one user message. No history, no streaming.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    /// Ask the provider for a JSON object response.
    pub json_response: bool,
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn text(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            json_response: false,
            max_tokens: None,
        }
    }

    pub fn json(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            json_response: true,
            ..Self::text(system, user)
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Returns the assistant message text.
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError>;
}

/// Removes a surrounding ```` ``` ```` / ```` ```json ```` fence, if any.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Parses model output as JSON, tolerating a markdown fence around it.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    serde_json::from_str(strip_code_fence(text))
        .map_err(|e| LlmError::InvalidResponse(format!("expected JSON document: {}", e)))
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::Semaphore;

    /// Replies with queued answers in order and records every request.
    #[derive(Default)]
    pub struct ScriptedLlm {
        replies: Mutex<VecDeque<Result<String, String>>>,
        pub requests: Mutex<Vec<ChatRequest>>,
        gate: Option<Semaphore>,
    }

    impl ScriptedLlm {
        pub fn reply(self, text: impl Into<String>) -> Self {
            self.replies.lock().unwrap().push_back(Ok(text.into()));
            self
        }

        pub fn fail(self, message: impl Into<String>) -> Self {
            self.replies.lock().unwrap().push_back(Err(message.into()));
            self
        }

        pub fn push_reply(&self, text: impl Into<String>) {
            self.replies.lock().unwrap().push_back(Ok(text.into()));
        }

        /// Each call waits for a `release` before answering.
        pub fn held(mut self) -> Self {
            self.gate = Some(Semaphore::new(0));
            self
        }

        pub fn release(&self) {
            if let Some(gate) = &self.gate {
                gate.add_permits(1);
            }
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatCompletion for ScriptedLlm {
        async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
            self.requests.lock().unwrap().push(request);
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(body)) => Err(LlmError::Api { status: 500, body }),
                None => Err(LlmError::InvalidResponse("no scripted reply left".to_string())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n[1]\n```\n"), "[1]");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn parse_json_reports_invalid_documents() {
        let ok: serde_json::Value = parse_json("```json\n{\"a\":1}\n```").unwrap();
        assert_eq!(ok["a"], 1);
        let err = parse_json::<serde_json::Value>("Claro! Aqui está").unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }
}
