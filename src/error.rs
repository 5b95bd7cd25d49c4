use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TsuyakuError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Translation backend timed out after {0:?}")]
    Timeout(Duration),

    #[error("Translation backend error: {0}")]
    Backend(String),

    #[error("Translation failed: {0}")]
    TranslationFailure(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Message text is empty")]
    EmptyInput,
}

pub type Result<T> = std::result::Result<T, TsuyakuError>;
