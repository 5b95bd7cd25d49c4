use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Result, TsuyakuError};
use super::backend::{transport_error, CompletionBackend, CompletionRequest};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` backend
pub struct OpenAiBackend {
    client: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl OpenAiBackend {
    pub fn new(endpoint: &str, api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            timeout,
        })
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = ChatRequest {
            model: &request.model,
            messages: vec![
                ChatMessage { role: "system", content: &request.system },
                ChatMessage { role: "user", content: &request.user },
            ],
            temperature: request.temperature,
            max_tokens: request.max_output_tokens,
            response_format: request
                .structured
                .then_some(ResponseFormat { kind: "json_object" }),
        };

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Sending chat completion request to: {}", url);

        let response = self.client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("OpenAI", e, self.timeout))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TsuyakuError::Backend(format!(
                "OpenAI API error {}: {}", status, error_text
            )));
        }

        let text = response.text().await
            .map_err(|e| transport_error("OpenAI", e, self.timeout))?;

        match serde_json::from_str::<ChatResponse>(&text) {
            Ok(parsed) => Ok(parsed
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .map(|content| content.trim().to_string())
                .unwrap_or_default()),
            Err(e) => {
                warn!("Unparsable OpenAI response, treating as empty: {}", e);
                Ok(String::new())
            }
        }
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(structured: bool) -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            system: "Translate the user's text into Japanese.".to_string(),
            user: "Text: \"\"\"你好\"\"\"".to_string(),
            temperature: 0.2,
            max_output_tokens: 256,
            structured,
        }
    }

    #[tokio::test]
    async fn test_returns_first_choice_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o-mini",
                "max_tokens": 256,
                "response_format": { "type": "json_object" }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":" {\"text\":\"こんにちは\"} "}}]}"#)
            .create_async()
            .await;

        let backend = OpenAiBackend::new(&server.url(), "sk-test".to_string(), Duration::from_secs(5)).unwrap();
        let raw = backend.complete(&request(true)).await.unwrap();

        assert_eq!(raw, "{\"text\":\"こんにちは\"}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_backend_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let backend = OpenAiBackend::new(&server.url(), "sk-test".to_string(), Duration::from_secs(5)).unwrap();
        let err = backend.complete(&request(false)).await.unwrap_err();

        match err {
            TsuyakuError::Backend(message) => assert!(message.contains("429")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let backend = OpenAiBackend::new(&server.url(), "sk-test".to_string(), Duration::from_secs(5)).unwrap();
        assert_eq!(backend.complete(&request(false)).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_no_choices_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let backend = OpenAiBackend::new(&server.url(), "sk-test".to_string(), Duration::from_secs(5)).unwrap();
        assert_eq!(backend.complete(&request(false)).await.unwrap(), "");
    }
}
