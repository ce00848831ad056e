//! Transcript data model.
//!
//! These types mirror what the presentation layer renders: messages with
//! their citations, and the metadata of files attached to the assistant.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::MessageId;

// =============================================================================
// Messages
// =============================================================================

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the person chatting.
    User,
    /// Produced by the hosted assistant.
    Assistant,
}

impl Role {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `{role, content}` pair as sent to the upstream chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Author of the turn.
    pub role: Role,
    /// Text of the turn.
    pub content: String,
}

impl ChatTurn {
    /// Build a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Build an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One entry of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Opaque identifier.
    pub id: MessageId,
    /// Author.
    pub role: Role,
    /// Text content. Grows while the reply streams.
    pub content: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Citations attached to this message, unique by [`Reference::key`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl Message {
    /// Create a message with a fresh ID and the current timestamp.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            references: Vec::new(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an empty assistant message, ready to receive deltas.
    #[must_use]
    pub fn assistant_placeholder() -> Self {
        Self::new(Role::Assistant, String::new())
    }

    /// The `{role, content}` pair sent upstream for this message.
    #[must_use]
    pub fn to_turn(&self) -> ChatTurn {
        ChatTurn {
            role: self.role,
            content: self.content.clone(),
        }
    }

    /// Attach a reference unless one with the same key is already present.
    ///
    /// Returns `true` if the reference was added.
    pub fn add_reference(&mut self, reference: &Reference) -> bool {
        merge_reference(&mut self.references, reference)
    }
}

// =============================================================================
// Citations
// =============================================================================

/// A citation pointing from an answer back to a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Identifier of the file in the assistant's file directory.
    #[serde(default)]
    pub file_id: String,
    /// Supporting excerpt.
    #[serde(default)]
    pub quote: String,
    /// Display name of the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Link to the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Reference {
    /// Create a reference to a file with a quote.
    pub fn new(file_id: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            quote: quote.into(),
            name: None,
            url: None,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the link.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Identity used for deduplication: the file ID, or the name when the
    /// upstream omitted the ID.
    #[must_use]
    pub fn key(&self) -> &str {
        if self.file_id.is_empty() {
            self.name.as_deref().unwrap_or_default()
        } else {
            &self.file_id
        }
    }

    /// Label for display: the name if known, otherwise the file ID.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.file_id)
    }
}

/// Append `reference` to `list` unless its key is already present.
///
/// First occurrence wins. Returns `true` if the list grew.
pub fn merge_reference(list: &mut Vec<Reference>, reference: &Reference) -> bool {
    if list.iter().any(|r| r.key() == reference.key()) {
        return false;
    }
    list.push(reference.clone());
    true
}

// =============================================================================
// Files
// =============================================================================

/// Metadata of a file attached to the assistant.
///
/// A read-only snapshot of what the upstream reported; never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Upstream file ID.
    pub id: String,
    /// File name.
    #[serde(default)]
    pub name: String,
    /// Size in bytes, if reported.
    #[serde(default)]
    pub size_bytes: Option<u64>,
    /// Creation time as reported by the upstream.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Processing status (e.g. `Processing`, `Available`).
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"assistant\"").unwrap(),
            Role::Assistant
        );
    }

    #[test]
    fn reference_key_falls_back_to_name() {
        let by_id = Reference::new("f1", "q").with_name("doc.pdf");
        assert_eq!(by_id.key(), "f1");

        let by_name = Reference::new("", "q").with_name("doc.pdf");
        assert_eq!(by_name.key(), "doc.pdf");
    }

    #[test]
    fn merge_reference_first_wins() {
        let mut list = Vec::new();
        assert!(merge_reference(&mut list, &Reference::new("f1", "first")));
        assert!(!merge_reference(&mut list, &Reference::new("f1", "second")));
        assert!(merge_reference(&mut list, &Reference::new("f2", "other")));

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].quote, "first");
    }

    #[test]
    fn message_omits_empty_references() {
        let msg = Message::user("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hi");
        assert!(json.get("references").is_none());
    }

    #[test]
    fn file_descriptor_tolerates_missing_fields() {
        let file: FileDescriptor = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(file.id, "abc");
        assert!(file.name.is_empty());
        assert!(file.size_bytes.is_none());
    }
}
