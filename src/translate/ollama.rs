use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Result, TsuyakuError};
use super::backend::{transport_error, CompletionBackend, CompletionRequest};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Ollama `/api/generate` backend
pub struct OllamaBackend {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl OllamaBackend {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout,
        })
    }
}

#[async_trait]
impl CompletionBackend for OllamaBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = GenerateRequest {
            model: &request.model,
            system: &request.system,
            prompt: &request.user,
            stream: false,
            format: request.structured.then_some("json"),
            options: GenerateOptions {
                temperature: request.temperature,
                num_predict: request.max_output_tokens,
            },
        };

        let url = format!("{}/api/generate", self.endpoint);
        debug!("Sending generate request to: {}", url);

        let response = self.client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("Ollama", e, self.timeout))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TsuyakuError::Backend(format!(
                "Ollama API error {}: {}", status, error_text
            )));
        }

        let text = response.text().await
            .map_err(|e| transport_error("Ollama", e, self.timeout))?;

        match serde_json::from_str::<GenerateResponse>(&text) {
            Ok(parsed) => Ok(parsed.response.trim().to_string()),
            Err(e) => {
                warn!("Unparsable Ollama response, treating as empty: {}", e);
                Ok(String::new())
            }
        }
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "qwen2.5:7b".to_string(),
            system: "Translate the user's text into Japanese.".to_string(),
            user: "Text: \"\"\"你好\"\"\"".to_string(),
            temperature: 0.2,
            max_output_tokens: 128,
            structured: true,
        }
    }

    #[tokio::test]
    async fn test_returns_generated_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "qwen2.5:7b",
                "stream": false,
                "format": "json",
                "options": { "num_predict": 128 }
            })))
            .with_status(200)
            .with_body(r#"{"response":"{\"text\":\"こんにちは\"}\n","done":true}"#)
            .create_async()
            .await;

        let backend = OllamaBackend::new(&format!("{}/", server.url()), Duration::from_secs(5)).unwrap();
        assert_eq!(backend.complete(&request()).await.unwrap(), "{\"text\":\"こんにちは\"}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_backend_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate")
            .with_status(404)
            .with_body("model not found")
            .create_async()
            .await;

        let backend = OllamaBackend::new(&server.url(), Duration::from_secs(5)).unwrap();
        assert!(matches!(backend.complete(&request()).await, Err(TsuyakuError::Backend(_))));
    }

    #[tokio::test]
    async fn test_malformed_body_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let backend = OllamaBackend::new(&server.url(), Duration::from_secs(5)).unwrap();
        assert_eq!(backend.complete(&request()).await.unwrap(), "");
    }
}
