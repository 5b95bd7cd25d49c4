use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use crate::error::{Result, TsuyakuError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub translate: TranslateConfig,
    #[serde(default)]
    pub reply: ReplyConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// OpenAI-compatible chat completions API
    OpenAi,
    /// Local Ollama server
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Which completion API to talk to
    pub kind: BackendKind,
    /// Base URL of the completion API
    pub endpoint: String,
    /// Model identifier passed to the backend
    pub model: String,
    /// Environment variable holding the API key (OpenAI only)
    pub api_key_env: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on generated tokens per call
    pub max_output_tokens: u32,
    /// Wall-clock budget for a single backend call
    pub timeout_secs: u64,
    /// Ask the model for a `{"text": "..."}` JSON envelope
    pub structured_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnclassifiedPolicy {
    /// Reply with a short usage hint instead of translating
    Guidance,
    /// Translate into Japanese anyway
    DefaultJapanese,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Extra attempts allowed when the backend echoes the source text
    pub max_retries: u32,
    /// What to do with text that has no CJK or Hangul characters
    pub unclassified: UnclassifiedPolicy,
    /// Specialty vocabulary whose literal sense must survive translation
    pub terminology_domain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyConfig {
    /// Sent in place of an empty translation
    pub empty_placeholder: String,
    /// Sent when every translation direction failed
    pub failure_message: String,
    /// Sent for unclassified input under the guidance policy
    pub guidance_message: String,
    pub japanese_label: String,
    pub chinese_label: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::OpenAi,
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.2,
            max_output_tokens: 512,
            timeout_secs: 8,
            structured_output: true,
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            unclassified: UnclassifiedPolicy::Guidance,
            terminology_domain: "semiconductors and photoresist materials".to_string(),
        }
    }
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            empty_placeholder: "（翻訳結果なし）".to_string(),
            failure_message: "翻訳中にエラーが発生しました。もう一度お試しください。".to_string(),
            guidance_message: "日本語・韓国語・中国語（繁体字）のテキストを送ってください。".to_string(),
            japanese_label: "Japanese".to_string(),
            chinese_label: "Traditional Chinese".to_string(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TsuyakuError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| TsuyakuError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend.timeout_secs == 0 {
            return Err(TsuyakuError::Config("backend.timeout_secs must be at least 1".to_string()));
        }
        if self.backend.max_output_tokens == 0 {
            return Err(TsuyakuError::Config("backend.max_output_tokens must be at least 1".to_string()));
        }
        if self.backend.endpoint.trim().is_empty() {
            return Err(TsuyakuError::Config("backend.endpoint must not be empty".to_string()));
        }
        Ok(())
    }
}
