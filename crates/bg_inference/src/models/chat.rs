use std::fmt;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use bg_core::{Error, Prompt, Result, TextGenerator};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::InferenceConfig;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

/// Client for OpenAI-compatible `chat/completions` endpoints.
pub struct ChatCompletionModel {
    client: Arc<Client>,
    config: InferenceConfig,
    api_key: String,
}

impl ChatCompletionModel {
    pub fn new(config: InferenceConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| {
                Error::Config(
                    "LLM_API_KEY is required for the chat completion backend".to_string(),
                )
            })?;
        Ok(Self {
            client: Arc::new(Client::new()),
            config,
            api_key,
        })
    }
}

impl fmt::Debug for ChatCompletionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatCompletionModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("endpoint_url", &self.config.endpoint_url.as_str())
            .field("model_name", &self.config.model_name)
            .finish()
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionModel {
    fn name(&self) -> &str {
        &self.config.model_name
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model_name,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
        };

        let mut builder = self
            .client
            .post(self.config.endpoint_url.clone())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("X-Title", &self.config.app_title)
            .json(&request);
        if let Some(referer) = &self.config.referer {
            builder = builder.header("HTTP-Referer", referer);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| {
                Error::Generation(format!(
                    "Request to {} failed: {}",
                    self.config.endpoint_url, e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "{} returned {}: {}",
                self.config.endpoint_url, status, body
            )));
        }

        let completion = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| Error::External(anyhow!("Failed to decode completion: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            tracing::warn!("{} returned no content", self.config.model_name);
        } else {
            tracing::debug!(
                "Received {} characters from {}",
                content.len(),
                self.config.model_name
            );
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> InferenceConfig {
        InferenceConfig {
            api_key: Some("test-key".to_string()),
            model_name: "test-model".to_string(),
            ..InferenceConfig::default()
        }
        .with_endpoint(&format!("{}/v1/chat/completions", server.uri()))
        .unwrap()
    }

    fn prompt() -> Prompt {
        Prompt {
            system: "system text".to_string(),
            user: "user text".to_string(),
        }
    }

    #[test]
    fn test_model_requires_api_key() {
        let result = ChatCompletionModel::new(InferenceConfig::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "test-model",
                "messages": [
                    {"role": "system", "content": "system text"},
                    {"role": "user", "content": "user text"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "  # Title\nMeta\nBody  "}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let model = ChatCompletionModel::new(config(&server)).unwrap();
        let text = model.generate(&prompt()).await.unwrap();
        assert_eq!(text, "# Title\nMeta\nBody");
    }

    #[tokio::test]
    async fn test_missing_content_is_empty_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let model = ChatCompletionModel::new(config(&server)).unwrap();
        assert_eq!(model.generate(&prompt()).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_error_status_is_generation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let model = ChatCompletionModel::new(config(&server)).unwrap();
        let err = model.generate(&prompt()).await.unwrap_err();
        match err {
            Error::Generation(message) => assert!(message.contains("rate limited")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
