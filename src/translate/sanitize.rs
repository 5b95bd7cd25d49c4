//! Cleanup of raw model output.
//!
//! Models wrap answers in JSON envelopes, markdown fences, or a pair of
//! quotes even when told not to. Nothing here can fail: when a rule does
//! not apply the text passes through trimmed.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TextEnvelope {
    text: String,
}

/// Bracket and quote pairs stripped when they enclose the whole output
const ENCLOSING_PAIRS: &[(char, char)] = &[
    ('「', '」'),
    ('『', '』'),
    ('“', '”'),
    ('‘', '’'),
    ('"', '"'),
    ('\'', '\''),
    ('《', '》'),
    ('〈', '〉'),
    ('【', '】'),
];

/// Clean raw backend output.
///
/// Unwraps fences and `{"text": ...}` envelopes, then strips one pair of
/// enclosing brackets or quotes. `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(raw: &str) -> String {
    let unwrapped = unwrap_layers(raw);

    match enclosing_pair(&unwrapped) {
        Some(inner) if !inner.is_empty() && is_bare(inner) => inner.to_string(),
        _ => unwrapped,
    }
}

/// Like [`sanitize`], but keeps enclosing brackets when the source text was
/// itself wrapped in a pair.
pub fn sanitize_against(source: &str, raw: &str) -> String {
    if enclosing_pair(source.trim()).is_some() {
        unwrap_layers(raw)
    } else {
        sanitize(raw)
    }
}

/// Text that no rule would change any further
fn is_bare(text: &str) -> bool {
    unwrap_layers(text) == text && enclosing_pair(text).is_none()
}

/// Repeatedly trim, remove code fences and unwrap JSON envelopes until the
/// text stops changing. Every step shortens the text, so this terminates.
fn unwrap_layers(raw: &str) -> String {
    let mut current = raw.trim().to_string();

    loop {
        let defenced = remove_code_fence(&current);
        let next = match serde_json::from_str::<TextEnvelope>(defenced) {
            Ok(envelope) => envelope.text.trim().to_string(),
            Err(_) => defenced.to_string(),
        };

        if next == current {
            return current;
        }
        current = next;
    }
}

fn remove_code_fence(text: &str) -> &str {
    match text.strip_prefix("```").and_then(|rest| rest.strip_suffix("```")) {
        Some(inner) => inner.strip_prefix("json").unwrap_or(inner).trim(),
        None => text,
    }
}

/// Inner text when `text` is wrapped in exactly one matching pair
fn enclosing_pair(text: &str) -> Option<&str> {
    ENCLOSING_PAIRS.iter().find_map(|&(open, close)| {
        let inner = text.strip_prefix(open)?.strip_suffix(close)?;
        if inner.contains(open) || inner.contains(close) {
            None
        } else {
            Some(inner.trim())
        }
    })
}
