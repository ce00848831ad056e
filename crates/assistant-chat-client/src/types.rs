//! Request and response types for the upstream API.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use assistant_chat_core::ChatTurn;

use crate::error::Result;

/// Model used when creating an assistant without one.
pub const DEFAULT_MODEL: &str = "gpt-4o";
/// Region used when creating an assistant without one.
pub const DEFAULT_REGION: &str = "us-east-1";
/// Instructions used when creating an assistant without any.
pub const DEFAULT_INSTRUCTIONS: &str = "You are a helpful assistant.";

// =============================================================================
// Chat
// =============================================================================

/// Body of an upstream chat request.
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub stream: bool,
    pub messages: &'a [ChatTurn],
}

// =============================================================================
// Files
// =============================================================================

/// A file to attach to an assistant.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Name sent with the multipart part.
    pub file_name: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
    /// MIME type of the content, if known.
    pub content_type: Option<String>,
    /// Arbitrary JSON metadata stored with the file.
    pub metadata: Option<Value>,
}

impl FileUpload {
    /// Create an upload from in-memory content.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
            content_type: None,
            metadata: None,
        }
    }

    /// Read a file from disk, naming the upload after the file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ClientError::Io`] if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(file_name, bytes))
    }

    /// Set the MIME type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Attach metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

// =============================================================================
// Assistants
// =============================================================================

/// Parameters for creating an assistant.
#[derive(Debug, Clone, Default)]
pub struct CreateAssistant {
    /// Assistant name.
    pub name: String,
    /// System instructions.
    pub instructions: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Deployment region.
    pub region: Option<String>,
}

impl CreateAssistant {
    /// Create with defaults for everything but the name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn to_wire(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "instructions": self.instructions.as_deref().unwrap_or(DEFAULT_INSTRUCTIONS),
            "model": { "name": self.model.as_deref().unwrap_or(DEFAULT_MODEL) },
            "region": self.region.as_deref().unwrap_or(DEFAULT_REGION),
        })
    }
}

/// An assistant as reported by the upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantInfo {
    /// Assistant name.
    #[serde(default)]
    pub name: String,
    /// Provisioning status (e.g. `Initializing`, `Ready`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Any other fields the upstream returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of the assistant listing endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ListAssistantsResponse {
    pub assistants: Vec<AssistantInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_assistant_fills_defaults() {
        let wire = CreateAssistant::new("docs").to_wire();
        assert_eq!(
            wire,
            json!({
                "name": "docs",
                "instructions": DEFAULT_INSTRUCTIONS,
                "model": {"name": DEFAULT_MODEL},
                "region": DEFAULT_REGION,
            })
        );
    }

    #[test]
    fn create_assistant_keeps_overrides() {
        let request = CreateAssistant {
            name: "docs".into(),
            instructions: Some("Be terse.".into()),
            model: Some("claude-3-5-sonnet".into()),
            region: Some("eu-west-1".into()),
        };
        let wire = request.to_wire();
        assert_eq!(wire["instructions"], "Be terse.");
        assert_eq!(wire["model"]["name"], "claude-3-5-sonnet");
        assert_eq!(wire["region"], "eu-west-1");
    }

    #[test]
    fn assistant_info_keeps_unknown_fields() {
        let info: AssistantInfo = serde_json::from_value(json!({
            "name": "docs",
            "status": "Ready",
            "host": "https://prod-1-data.ke.pinecone.io"
        }))
        .unwrap();
        assert_eq!(info.name, "docs");
        assert_eq!(info.status.as_deref(), Some("Ready"));
        assert!(info.extra.contains_key("host"));
    }

    #[tokio::test]
    async fn upload_from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let upload = FileUpload::from_path(&path).await.unwrap();
        assert_eq!(upload.file_name, "notes.txt");
        assert_eq!(upload.bytes, b"hello");
    }

    #[tokio::test]
    async fn upload_from_missing_path_is_io_error() {
        let err = FileUpload::from_path("/definitely/not/here.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, crate::ClientError::Io(_)));
    }
}
