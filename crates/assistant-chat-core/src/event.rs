//! Decoded stream events.

use serde::{Deserialize, Serialize};

use crate::message::Reference;

/// One decoded unit of the upstream chat feed.
///
/// A single server-sent event may decode into several of these; content and
/// references can arrive together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Text to append to the open assistant message.
    ContentDelta {
        /// The fragment, appended verbatim.
        text: String,
    },
    /// Citations supporting the open assistant message.
    ReferenceDelta {
        /// References in arrival order; may contain duplicates.
        references: Vec<Reference>,
    },
    /// The reply is complete.
    #[serde(rename = "finish")]
    FinishSignal {
        /// Upstream finish reason (e.g. `stop`).
        reason: String,
    },
    /// The event payload could not be parsed. Skipped by consumers.
    ParseError {
        /// Parser diagnostic.
        message: String,
    },
}

impl StreamEvent {
    /// Shorthand for a content delta.
    pub fn content(text: impl Into<String>) -> Self {
        Self::ContentDelta { text: text.into() }
    }

    /// Shorthand for a finish signal.
    pub fn finish(reason: impl Into<String>) -> Self {
        Self::FinishSignal {
            reason: reason.into(),
        }
    }

    /// Whether this event ends the reply.
    #[must_use]
    pub const fn is_finish(&self) -> bool {
        matches!(self, Self::FinishSignal { .. })
    }
}
