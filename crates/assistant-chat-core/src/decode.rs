//! Classification of chat stream payloads.
//!
//! Each SSE `data` payload is a JSON object in the chat-completions shape:
//!
//! ```text
//! {"choices": [{"delta": {"content": "...", "references": [...]},
//!               "finish_reason": "stop"}]}
//! ```
//!
//! The upstream is not consistent about where citations live or how they
//! are shaped, so references are collected from `delta.references`, the
//! top-level `references` and `citation.references`, and each entry is
//! normalized by [`normalize_reference`].

use serde_json::Value;

use crate::event::StreamEvent;
use crate::message::Reference;

/// Non-JSON payload some upstreams send after the last chunk.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Decode one event payload into zero or more stream events.
///
/// Order within the result is content, then references, then finish, so a
/// payload that carries both text and a finish reason loses nothing.
/// Malformed JSON yields a single [`StreamEvent::ParseError`]; it never
/// aborts the stream.
#[must_use]
pub fn decode_payload(data: &str) -> Vec<StreamEvent> {
    let data = data.trim();
    if data.is_empty() {
        return Vec::new();
    }
    if data == DONE_SENTINEL {
        return vec![StreamEvent::finish("done")];
    }

    match serde_json::from_str::<Value>(data) {
        Ok(value) => classify(&value),
        Err(e) => {
            tracing::warn!(error = %e, payload = %data, "Skipping malformed stream event");
            vec![StreamEvent::ParseError {
                message: e.to_string(),
            }]
        }
    }
}

fn classify(value: &Value) -> Vec<StreamEvent> {
    // Chat-completions payloads nest everything under choices[0]; flatter
    // payloads put delta / finish_reason at the top level.
    let choice = value
        .get("choices")
        .and_then(|choices| choices.get(0))
        .unwrap_or(value);
    let delta = choice.get("delta").or_else(|| value.get("delta"));

    let mut events = Vec::new();

    if let Some(text) = delta.and_then(|d| d.get("content")).and_then(Value::as_str) {
        if !text.is_empty() {
            events.push(StreamEvent::content(text));
        }
    }

    let sources = [
        delta.and_then(|d| d.get("references")),
        value.get("references"),
        value.get("citation").and_then(|c| c.get("references")),
    ];
    let references: Vec<Reference> = sources
        .into_iter()
        .flatten()
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(normalize_reference)
        .collect();
    if !references.is_empty() {
        events.push(StreamEvent::ReferenceDelta { references });
    }

    let reason = choice
        .get("finish_reason")
        .or_else(|| value.get("finish_reason"))
        .and_then(Value::as_str)
        .filter(|reason| !reason.is_empty());
    if let Some(reason) = reason {
        events.push(StreamEvent::finish(reason));
    }

    events
}

/// Normalize one upstream citation entry.
///
/// Accepted shapes:
///
/// - `{"file_id": "...", "quote": "...", "name": "...", "url": "..."}`
/// - `{"file": {"id": "...", "name": "...", "signed_url": "..."}, "pages": [...]}`
/// - `{"id": "...", "title": "...", "excerpt": "..."}`
///
/// Returns `None` for entries with neither a file ID nor a name, since they
/// cannot be deduplicated or linked.
#[must_use]
pub fn normalize_reference(entry: &Value) -> Option<Reference> {
    let file = entry.get("file");

    let file_id = text_field(entry, "file_id")
        .or_else(|| file.and_then(|f| text_field(f, "id")))
        .or_else(|| text_field(entry, "id"))
        .unwrap_or_default();
    let name = text_field(entry, "name")
        .or_else(|| file.and_then(|f| text_field(f, "name")))
        .or_else(|| text_field(entry, "title"));
    let url = text_field(entry, "url")
        .or_else(|| file.and_then(|f| text_field(f, "signed_url")))
        .or_else(|| file.and_then(|f| text_field(f, "url")));
    let quote = text_field(entry, "quote")
        .or_else(|| text_field(entry, "excerpt"))
        .unwrap_or_default();

    if file_id.is_empty() && name.is_none() {
        tracing::debug!(entry = %entry, "Dropping reference without file id or name");
        return None;
    }

    Some(Reference {
        file_id,
        quote,
        name,
        url,
    })
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
