// Translation pipeline
//
// Leaf to root:
// - prompt: instruction payload per target language
// - backend: completion APIs (OpenAI, Ollama) behind a timeout-enforcing client
// - sanitize: cleanup of raw model output
// - retry: echo detection
// - orchestrator: classify, fan out, retry, assemble the reply

pub mod backend;
pub mod ollama;
pub mod openai;
pub mod orchestrator;
pub mod prompt;
pub mod retry;
pub mod sanitize;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use backend::{BackendFactory, CompletionBackend, CompletionRequest, TranslationClient};
pub use orchestrator::Translator;
pub use prompt::{PromptBuilder, PromptPayload};
pub use retry::RetryPolicy;
pub use sanitize::{sanitize, sanitize_against};

use crate::config::UnclassifiedPolicy;
use crate::script::ScriptCategory;

/// Languages the bot translates into. Declaration order is reply order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TargetLanguage {
    Ja,
    ZhTw,
}

impl TargetLanguage {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Ja => "ja",
            Self::ZhTw => "zh-TW",
        }
    }

    /// Language name as written into prompts
    pub fn prompt_name(&self) -> &'static str {
        match self {
            Self::Ja => "Japanese",
            Self::ZhTw => "Traditional Chinese as written in Taiwan (台灣華語, 繁體字)",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Source script paired with the language it must be translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationDirection {
    pub source: ScriptCategory,
    pub target: TargetLanguage,
}

/// Resolve the directions for a script category.
///
/// An empty result means no translation applies and the caller should
/// answer with guidance instead.
pub fn directions_for(category: ScriptCategory, policy: UnclassifiedPolicy) -> Vec<TranslationDirection> {
    let targets: &[TargetLanguage] = match (category, policy) {
        (ScriptCategory::Hangul, _) => &[TargetLanguage::Ja, TargetLanguage::ZhTw],
        (ScriptCategory::KanaBearing, _) => &[TargetLanguage::ZhTw],
        (ScriptCategory::HanOnly, _) => &[TargetLanguage::Ja],
        (ScriptCategory::Unclassified, UnclassifiedPolicy::DefaultJapanese) => &[TargetLanguage::Ja],
        (ScriptCategory::Unclassified, UnclassifiedPolicy::Guidance) => &[],
    };

    targets
        .iter()
        .map(|&target| TranslationDirection { source: category, target })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub target: TargetLanguage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub target: TargetLanguage,
    /// Empty when the direction failed or the model produced nothing
    pub text: String,
    pub retried: bool,
}

impl TranslationResult {
    pub fn empty(target: TargetLanguage) -> Self {
        Self {
            target,
            text: String::new(),
            retried: false,
        }
    }
}
