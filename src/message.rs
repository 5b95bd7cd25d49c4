use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TsuyakuError};

/// A text message handed over by the messaging platform layer.
///
/// The sender is opaque to translation; it is carried so the delivery side
/// can address the reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMessage {
    text: String,
    sender: String,
    received_at: DateTime<Utc>,
}

impl InputMessage {
    pub fn new(text: impl AsRef<str>, sender: impl Into<String>) -> Result<Self> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(TsuyakuError::EmptyInput);
        }

        Ok(Self {
            text: text.to_string(),
            sender: sender.into(),
            received_at: Utc::now(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}
