//! Chat relay endpoint.
//!
//! Forwards the conversation upstream and either re-emits the decoded
//! events as server-sent events or accumulates the reply server-side.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::{future, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::time::{timeout_at, Instant};

use assistant_chat_client::{collect_reply, AssistantApi, ChatStream, StreamError};
use assistant_chat_core::{ChatTurn, Message, StreamEvent};

use crate::error::ApiError;
use crate::state::GatewayState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Request body for a chat turn.
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    /// Assistant to use instead of the configured one.
    #[serde(default)]
    pub assistant_name: Option<String>,
    /// Full conversation, ending with the new user turn.
    #[serde(default)]
    pub messages: Vec<ChatTurn>,
    /// Stream events (default) or return the sealed reply.
    #[serde(default = "default_stream")]
    pub stream: bool,
}

const fn default_stream() -> bool {
    true
}

/// Response for a non-streaming chat turn.
#[derive(Debug, Serialize)]
pub struct ChatReplyResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// The sealed assistant message.
    pub message: Message,
}

// =============================================================================
// Handlers
// =============================================================================

/// Run one chat turn.
///
/// ```text
/// POST /api/chat
/// { "messages": [{"role": "user", "content": "Hello"}], "stream": true }
///
/// Response: 200 OK, text/event-stream
/// data: {"type":"content_delta","text":"Hi"}
/// data: {"type":"finish","reason":"stop"}
/// ```
///
/// Upstream failures before the first event keep the upstream status.
/// Failures after streaming started are sent as a final `error` event.
/// Opening the stream, and for non-streaming turns the whole reply, must
/// finish within the configured request timeout or the turn fails with 500.
pub async fn chat<A>(
    State(state): State<Arc<GatewayState<A>>>,
    payload: Result<Json<ChatBody>, JsonRejection>,
) -> Result<Response, ApiError>
where
    A: AssistantApi + 'static,
{
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected chat body");
        ApiError::BadRequest("Invalid JSON in request body.".to_string())
    })?;
    validate_messages(&body.messages)?;

    let assistant = state.resolve_assistant(body.assistant_name.as_deref());
    tracing::info!(
        assistant = %assistant,
        turns = body.messages.len(),
        stream = body.stream,
        "Relaying chat turn"
    );

    let deadline = Instant::now() + state.config.request_timeout();
    let mut stream = timeout_at(deadline, state.api.open_chat(&assistant, &body.messages))
        .await
        .map_err(|e| ApiError::internal("Assistant did not respond in time", e))?
        .map_err(|e| ApiError::from_client("Failed to reach the assistant", e))?;

    if body.stream {
        return Ok(sse_response(stream).into_response());
    }

    let message = timeout_at(deadline, collect_reply(&mut stream))
        .await
        .map_err(|e| ApiError::internal("Assistant reply timed out", e))?
        .map_err(|e| ApiError::internal("Assistant reply did not complete", e))?;
    Ok(Json(ChatReplyResponse {
        status: "success",
        message,
    })
    .into_response())
}

fn validate_messages(messages: &[ChatTurn]) -> Result<(), ApiError> {
    if messages.is_empty() {
        return Err(ApiError::BadRequest(
            "messages must be a non-empty array".to_string(),
        ));
    }
    if messages.iter().any(|m| m.content.trim().is_empty()) {
        return Err(ApiError::BadRequest(
            "message content must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Re-emit decoded events. Parse errors are dropped; a stream error ends
/// the response with an `error` event. Dropping the response (client
/// disconnect) drops the upstream connection.
fn sse_response(
    stream: ChatStream,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
    let events = stream.into_events().filter_map(|item| {
        future::ready(match item {
            Ok(StreamEvent::ParseError { .. }) => None,
            Ok(event) => Some(Ok::<_, Infallible>(to_sse(&event))),
            Err(err) => Some(Ok(error_event(&err))),
        })
    });
    Sse::new(events).keep_alive(KeepAlive::default())
}

fn to_sse(event: &StreamEvent) -> Event {
    match Event::default().json_data(event) {
        Ok(sse) => sse,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode stream event");
            Event::default().data(r#"{"type":"error","message":"encoding failure"}"#)
        }
    }
}

fn error_event(err: &StreamError) -> Event {
    tracing::warn!(error = %err, "Chat stream ended early");
    let payload = serde_json::json!({ "type": "error", "message": err.to_string() });
    Event::default().data(payload.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_defaults_to_true() {
        let body: ChatBody =
            serde_json::from_str(r#"{"messages":[{"role":"user","content":"hi"}]}"#).unwrap();
        assert!(body.stream);
        assert!(body.assistant_name.is_none());
    }

    #[test]
    fn rejects_empty_history() {
        assert!(matches!(
            validate_messages(&[]),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn rejects_blank_content() {
        let messages = vec![ChatTurn::user("hi"), ChatTurn::assistant("  ")];
        assert!(validate_messages(&messages).is_err());
        assert!(validate_messages(&messages[..1]).is_ok());
    }
}
