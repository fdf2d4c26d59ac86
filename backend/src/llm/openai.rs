use crate::config::LlmSettings;
use crate::llm::{ChatCompletion, ChatRequest, LlmError};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI-compatible `/chat/completions` client.
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_key: settings.api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }
}

#[async_trait]
impl ChatCompletion for OpenAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::NotConfigured)?;

        let body = CompletionBody {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![
                Message {
                    role: "system",
                    content: &request.system,
                },
                Message {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: request.max_tokens,
            response_format: request.json_response.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        debug!(
            "chat completion: model={}, json={}, prompt_chars={}",
            self.model,
            request.json_response,
            request.user.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("chat completion failed with {}: {}", status, body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::InvalidResponse("empty completion".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base_url: String, api_key: Option<&str>) -> LlmSettings {
        LlmSettings {
            api_key: api_key.map(str::to_string),
            base_url,
            model: "gpt-test".to_string(),
            temperature: 0.2,
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn sends_messages_and_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(bearer_token("sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-test",
                "response_format": { "type": "json_object" },
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "hello" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "{\"ok\":true}" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&settings(server.uri(), Some("sk-test"))).unwrap();
        let text = client
            .complete(ChatRequest::json("sys", "hello"))
            .await
            .unwrap();
        assert_eq!(text, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn surfaces_api_errors_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&settings(server.uri(), Some("sk-test"))).unwrap();
        let err = client
            .complete(ChatRequest::text("sys", "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 429, ref body } if body == "slow down"));
    }

    #[tokio::test]
    async fn missing_key_fails_without_calling_out() {
        let server = MockServer::start().await;
        let client = OpenAiClient::new(&settings(server.uri(), None)).unwrap();
        let err = client
            .complete(ChatRequest::text("sys", "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
