use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ReplyConfig;
use crate::error::Result;
use crate::message::InputMessage;
use crate::translate::{TargetLanguage, TranslationResult};

/// One outbound text message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyBlock {
    pub label: Option<String>,
    pub text: String,
}

impl ReplyBlock {
    pub fn unlabeled(text: impl Into<String>) -> Self {
        Self { label: None, text: text.into() }
    }

    /// Text as it is sent to the chat
    pub fn render(&self) -> String {
        match &self.label {
            Some(label) => format!("【{}】\n{}", label, self.text),
            None => self.text.clone(),
        }
    }
}

/// Ordered reply for one inbound message
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReplyPayload {
    pub blocks: Vec<ReplyBlock>,
}

impl ReplyPayload {
    pub fn single(text: impl Into<String>) -> Self {
        Self { blocks: vec![ReplyBlock::unlabeled(text)] }
    }

    pub fn messages(&self) -> Vec<String> {
        self.blocks.iter().map(ReplyBlock::render).collect()
    }

    pub fn labels(&self) -> Vec<Option<&str>> {
        self.blocks.iter().map(|block| block.label.as_deref()).collect()
    }
}

/// Turns per-direction results into reply blocks
#[derive(Debug, Clone)]
pub struct ReplyAssembler {
    empty_placeholder: String,
    japanese_label: String,
    chinese_label: String,
}

impl ReplyAssembler {
    pub fn from_config(config: &ReplyConfig) -> Self {
        Self {
            empty_placeholder: config.empty_placeholder.clone(),
            japanese_label: config.japanese_label.clone(),
            chinese_label: config.chinese_label.clone(),
        }
    }

    pub fn label_for(&self, target: TargetLanguage) -> &str {
        match target {
            TargetLanguage::Ja => &self.japanese_label,
            TargetLanguage::ZhTw => &self.chinese_label,
        }
    }

    /// A single result becomes one unlabeled block; several become labeled
    /// blocks, Japanese before Chinese whatever order they arrive in.
    pub fn assemble(&self, mut results: Vec<TranslationResult>) -> ReplyPayload {
        results.sort_by_key(|result| result.target);
        let labeled = results.len() > 1;

        let blocks = results
            .into_iter()
            .map(|result| {
                let text = if result.text.trim().is_empty() {
                    self.empty_placeholder.clone()
                } else {
                    result.text
                };
                ReplyBlock {
                    label: labeled.then(|| self.label_for(result.target).to_string()),
                    text,
                }
            })
            .collect();

        ReplyPayload { blocks }
    }
}

impl Default for ReplyAssembler {
    fn default() -> Self {
        Self::from_config(&ReplyConfig::default())
    }
}

/// Delivers a reply back to the sender of a message
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn deliver(&self, message: &InputMessage, payload: &ReplyPayload) -> Result<()>;
}

/// Prints replies to standard output
pub struct StdoutSink;

#[async_trait]
impl ReplySink for StdoutSink {
    async fn deliver(&self, message: &InputMessage, payload: &ReplyPayload) -> Result<()> {
        info!("Replying to {} with {} message(s)", message.sender(), payload.blocks.len());
        println!("{}", payload.messages().join("\n\n"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(target: TargetLanguage, text: &str) -> TranslationResult {
        TranslationResult { target, text: text.to_string(), retried: false }
    }

    #[test]
    fn test_single_result_is_unlabeled() {
        let payload = ReplyAssembler::default().assemble(vec![result(TargetLanguage::ZhTw, "你好")]);

        assert_eq!(payload.blocks, vec![ReplyBlock::unlabeled("你好")]);
        assert_eq!(payload.messages(), vec!["你好".to_string()]);
    }

    #[test]
    fn test_two_results_are_labeled_japanese_first() {
        let payload = ReplyAssembler::default().assemble(vec![
            result(TargetLanguage::ZhTw, "你好"),
            result(TargetLanguage::Ja, "こんにちは"),
        ]);

        assert_eq!(payload.labels(), vec![Some("Japanese"), Some("Traditional Chinese")]);
        assert_eq!(payload.messages()[0], "【Japanese】\nこんにちは");
        assert_eq!(payload.messages()[1], "【Traditional Chinese】\n你好");
    }

    #[test]
    fn test_empty_text_gets_placeholder() {
        let assembler = ReplyAssembler::default();
        let payload = assembler.assemble(vec![
            result(TargetLanguage::Ja, "こんにちは"),
            TranslationResult::empty(TargetLanguage::ZhTw),
        ]);

        assert_eq!(payload.blocks[1].text, ReplyConfig::default().empty_placeholder);
    }
}
