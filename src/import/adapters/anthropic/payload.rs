//! Wire types and response decoding for the Messages API.

use crate::import::ports::IndexedVerdict;
use serde::{Deserialize, Serialize};

/// Messages API request body.
#[derive(Debug, Serialize)]
pub(super) struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub messages: Vec<Message>,
}

/// One chat message in a Messages API request.
#[derive(Debug, Serialize)]
pub(super) struct Message {
    pub role: &'static str,
    pub content: String,
}

/// Messages API response envelope; only text content matters here.
#[derive(Debug, Deserialize)]
pub(super) struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// One content block of a Messages API response.
#[derive(Debug, Deserialize)]
pub(super) struct ContentBlock {
    #[serde(default)]
    pub text: String,
}

impl MessagesResponse {
    /// Returns the first content block's text, if any.
    pub(super) fn first_text(&self) -> Option<&str> {
        self.content.first().map(|block| block.text.as_str())
    }
}

/// Decodes the model's answer into verdicts; `None` when the text is not
/// a JSON verdict array (after unwrapping optional Markdown code fences).
pub(crate) fn parse_verdicts(text: &str) -> Option<Vec<IndexedVerdict>> {
    serde_json::from_str(strip_code_fences(text)).ok()
}

/// Unwraps a ```` ```json … ``` ```` fence when present.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let without_tag = after_open.strip_prefix("json").unwrap_or(after_open);
    let body = without_tag.strip_suffix("```").unwrap_or(without_tag);
    body.trim()
}
