use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{BackendConfig, BackendKind};
use crate::error::{Result, TsuyakuError};
use super::ollama::OllamaBackend;
use super::openai::OpenAiBackend;
use super::prompt::PromptPayload;

/// Parameters of a single text-generation call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub structured: bool,
}

/// A text-generation service.
///
/// Implementations return an empty string when the service answered but the
/// body held nothing usable, and an error when the call itself failed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Factory for creating backend instances
pub struct BackendFactory;

impl BackendFactory {
    pub fn create(config: &BackendConfig) -> Result<Arc<dyn CompletionBackend>> {
        match config.kind {
            BackendKind::OpenAi => {
                let api_key = config.api_key().ok_or_else(|| {
                    TsuyakuError::Config(format!(
                        "OpenAI backend needs an API key in ${}",
                        config.api_key_env
                    ))
                })?;
                Ok(Arc::new(OpenAiBackend::new(&config.endpoint, api_key, config.timeout())?))
            }
            BackendKind::Ollama => {
                Ok(Arc::new(OllamaBackend::new(&config.endpoint, config.timeout())?))
            }
        }
    }
}

/// Calls a backend with the configured model settings under a deadline.
///
/// No retries happen here. A call that misses the deadline is dropped,
/// which cancels the in-flight HTTP request.
#[derive(Clone)]
pub struct TranslationClient {
    backend: Arc<dyn CompletionBackend>,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    timeout: Duration,
}

impl TranslationClient {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: &BackendConfig) -> Self {
        Self {
            backend,
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            timeout: config.timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn invoke(&self, prompt: &PromptPayload) -> Result<String> {
        let request = CompletionRequest {
            model: self.model.clone(),
            system: prompt.system.clone(),
            user: prompt.user.clone(),
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            structured: prompt.structured,
        };

        debug!("Sending {} request to {} ({})", prompt.target, self.backend.name(), self.model);

        match tokio::time::timeout(self.timeout, self.backend.complete(&request)).await {
            Ok(Ok(raw)) => {
                debug!("Raw {} response: {}", self.backend.name(), raw);
                Ok(raw)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                warn!("{} call for {} exceeded {:?}", self.backend.name(), prompt.target, self.timeout);
                Err(TsuyakuError::Timeout(self.timeout))
            }
        }
    }
}

/// Map a transport failure onto the error taxonomy
pub(crate) fn transport_error(backend: &str, e: reqwest::Error, timeout: Duration) -> TsuyakuError {
    if e.is_timeout() {
        TsuyakuError::Timeout(timeout)
    } else {
        TsuyakuError::Backend(format!("{} request failed: {}", backend, e))
    }
}
