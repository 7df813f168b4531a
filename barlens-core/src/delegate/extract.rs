//! Answer extraction from completion responses.
//!
//! Providers disagree on where the answer lives. Each strategy looks in one
//! place and returns text or nothing; they are tried in order and the first
//! hit wins.

use serde_json::Value;
use tracing::debug;

use super::DelegationError;

pub type Extractor = fn(&Value) -> Option<String>;

/// Extraction strategies, in priority order.
pub const STRATEGIES: &[(&str, Extractor)] = &[
    ("content", message_content),
    ("content_parts", message_content_parts),
    ("reasoning_content", reasoning_content),
];

/// Pull the answer text out of a response body.
pub fn extract_answer(body: &Value) -> Result<String, DelegationError> {
    for (name, strategy) in STRATEGIES {
        if let Some(text) = strategy(body) {
            debug!(strategy = name, "extracted completion text");
            return Ok(text);
        }
    }
    if let Some(message) = body.pointer("/error/message").and_then(Value::as_str) {
        return Err(DelegationError::Api(message.to_string()));
    }
    Err(DelegationError::EmptyResponse)
}

/// `choices[0].message.content` as a plain string.
fn message_content(body: &Value) -> Option<String> {
    non_empty(body.pointer("/choices/0/message/content")?.as_str()?)
}

/// `choices[0].message.content` as an array of `{type, text}` parts.
fn message_content_parts(body: &Value) -> Option<String> {
    let parts = body.pointer("/choices/0/message/content")?.as_array()?;
    let text: Vec<&str> = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    non_empty(&text.join(""))
}

/// `choices[0].message.reasoning_content`, used by reasoning models that
/// leave `content` empty.
fn reasoning_content(body: &Value) -> Option<String> {
    non_empty(body.pointer("/choices/0/message/reasoning_content")?.as_str()?)
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
