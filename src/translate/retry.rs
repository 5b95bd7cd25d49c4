use crate::config::TranslateConfig;

/// Characters ignored when comparing source and output
const IGNORED_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '…', '~',
    '。', '、', '！', '？', '，', '．', '；', '：', '～', '・',
];

/// Detects echo failures: the model answered with the source text.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_retries: u32,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    pub fn from_config(config: &TranslateConfig) -> Self {
        Self::new(config.max_retries)
    }

    /// Extra attempts allowed after the first one
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// True when `output` equals `input` once whitespace and sentence
    /// punctuation are ignored.
    pub fn should_retry(&self, input: &str, output: &str) -> bool {
        normalize(input) == normalize(output)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1)
    }
}

fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !IGNORED_PUNCTUATION.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_echo_retries() {
        let policy = RetryPolicy::default();
        for input in ["안녕하세요", "こんにちは", "你好", "hello"] {
            assert!(policy.should_retry(input, input));
        }
    }

    #[test]
    fn test_echo_with_punctuation_or_spacing_retries() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry("こんにちは", "こんにちは。"));
        assert!(policy.should_retry("안녕하세요", " 안녕하세요! "));
        assert!(policy.should_retry("你好", "你好，"));
    }

    #[test]
    fn test_real_translation_does_not_retry() {
        let policy = RetryPolicy::default();
        assert!(!policy.should_retry("こんにちは", "a different translation"));
        assert!(!policy.should_retry("こんにちは", "你好"));
    }
}
