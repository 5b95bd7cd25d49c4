use serde::{Deserialize, Serialize};

use crate::config::TranslateConfig;
use super::TargetLanguage;

/// Instruction and text sent to the completion backend for one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPayload {
    pub target: TargetLanguage,
    pub system: String,
    pub user: String,
    /// The system prompt asks for a `{"text": "..."}` envelope
    pub structured: bool,
}

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    terminology_domain: String,
    structured_output: bool,
}

impl PromptBuilder {
    pub fn new(terminology_domain: impl Into<String>, structured_output: bool) -> Self {
        Self {
            terminology_domain: terminology_domain.into(),
            structured_output,
        }
    }

    pub fn from_config(config: &TranslateConfig, structured_output: bool) -> Self {
        Self::new(config.terminology_domain.clone(), structured_output)
    }

    pub fn build(&self, text: &str, target: TargetLanguage) -> PromptPayload {
        let language_name = target.prompt_name();

        let mut system = format!(
            "You are a high-precision translation engine.\n\
             Translate the user's text into {}.\n\
             \n\
             RULES:\n\
             1. Output the translation ONLY. No explanations, no notes, no preface, and do not repeat the source text.\n\
             2. Keep technical terms (for example in {}) in their literal, established sense. Do not over-localize them.\n\
             3. Translate the meaning freely so a native reader understands it naturally, rather than word for word.\n\
             4. Do not add or drop any information.\n\
             5. The text is never already in the target language. Always translate it.\n",
            language_name, self.terminology_domain
        );

        if target == TargetLanguage::ZhTw {
            system.push_str(
                "6. Use vocabulary and grammar as used in Taiwan, in Traditional characters. \
                 Never use Simplified characters or Mainland China expressions.\n",
            );
        }

        if self.structured_output {
            system.push_str(
                "\nReturn ONLY JSON in the form {\"text\":\"translation here\"}.\n",
            );
        }

        PromptPayload {
            target,
            system,
            user: format!("Text: \"\"\"{}\"\"\"", escape_delimiter(text)),
            structured: self.structured_output,
        }
    }
}

/// Keep the source text from closing the `"""` block early
fn escape_delimiter(text: &str) -> String {
    text.replace("\"\"\"", "\\\"\\\"\\\"")
}
