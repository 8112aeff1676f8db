// Groq chat-completions client
//
// Talks to Groq's OpenAI-compatible endpoint. One attempt per call with an
// explicit timeout, never retried.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RelayConfig;
use crate::error::{RelayError, UpstreamError};

/// Message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: String, // "system" or "user"
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request to the completions endpoint
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Anything that can turn a system prompt and a user message into a raw
/// completion body
#[async_trait]
pub trait CompletionApi: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, UpstreamError>;
}

pub struct GroqClient {
    api_key: String,
    url: String,
    model: String,
    max_tokens: Option<u32>,
    client: Client,
}

impl GroqClient {
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(RelayError::HttpClient)?;

        Ok(Self {
            api_key: config.api_key.clone(),
            url: config.completions_url(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            client,
        })
    }
}

#[async_trait]
impl CompletionApi for GroqClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, UpstreamError> {
        let request = CompletionRequest {
            model: &self.model,
            messages: vec![Message::system(system_prompt), Message::user(user_message)],
            max_tokens: self.max_tokens,
        };

        debug!(model = %self.model, url = %self.url, "Sending completion request");

        let response = self
            .client
            .post(&self.url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Upstream returned an error status");
            return Err(UpstreamError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header as header_is, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COMPLETIONS_PATH: &str = "/openai/v1/chat/completions";

    fn config_for(server: &MockServer) -> RelayConfig {
        let mut config = RelayConfig::new("gsk_test");
        config.api_base = server.uri();
        config
    }

    #[tokio::test]
    async fn test_sends_bearer_key_model_and_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .and(header_is("authorization", "Bearer gsk_test"))
            .and(body_json(json!({
                "model": "mixtral-8x7b-32768",
                "messages": [
                    {"role": "system", "content": "be nice"},
                    {"role": "user", "content": "Hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"choices":[]}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = GroqClient::new(&config_for(&server)).unwrap();
        let body = client.complete("be nice", "Hello").await.unwrap();
        assert_eq!(body, r#"{"choices":[]}"#);
    }

    #[tokio::test]
    async fn test_max_tokens_forwarded_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .and(body_json(json!({
                "model": "mixtral-8x7b-32768",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hi"}
                ],
                "max_tokens": 256
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.max_tokens = Some(256);
        let client = GroqClient::new(&config).unwrap();
        assert!(client.complete("sys", "hi").await.is_ok());
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_string(r#"{"error":{"message":"Rate limit reached"}}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = GroqClient::new(&config_for(&server)).unwrap();
        let err = client.complete("sys", "hi").await.unwrap_err();
        assert!(err.is_rate_limited());
        match err {
            UpstreamError::Http { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("Rate limit reached"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.timeout = Duration::from_millis(200);
        let client = GroqClient::new(&config).unwrap();

        let err = client.complete("sys", "hi").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Network(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let mut config = RelayConfig::new("gsk_test");
        config.api_base = "http://127.0.0.1:9".to_string();
        let client = GroqClient::new(&config).unwrap();

        let err = client.complete("sys", "hi").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Network(_)));
    }
}
