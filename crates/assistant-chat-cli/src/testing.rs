//! In-memory [`AssistantApi`] for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream;

use assistant_chat_client::{
    AssistantApi, AssistantInfo, ChatStream, ClientError, CreateAssistant, FileUpload, Result,
    StreamError,
};
use assistant_chat_core::{ChatTurn, FileDescriptor};

#[derive(Default)]
pub struct FakeApi {
    chunks: Vec<String>,
    /// Chat fails to open with this status and message.
    reject: Option<(u16, String)>,
    /// Chat body never ends.
    hang: bool,
    pub files: Vec<FileDescriptor>,
    pub assistants: Vec<String>,
    chats: Mutex<Vec<(String, usize)>>,
    uploads: Mutex<Vec<FileUpload>>,
}

impl FakeApi {
    pub fn replying(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| (*c).to_string()).collect(),
            assistants: vec!["docs".to_string()],
            ..Self::default()
        }
    }

    pub fn rejecting(status: u16, message: &str) -> Self {
        Self {
            reject: Some((status, message.to_string())),
            ..Self::default()
        }
    }

    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    /// `(assistant, history length)` of every chat opened.
    pub fn chats(&self) -> Vec<(String, usize)> {
        self.chats.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<(String, Option<serde_json::Value>)> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|u| (u.file_name.clone(), u.metadata.clone()))
            .collect()
    }
}

#[async_trait]
impl AssistantApi for FakeApi {
    fn assistant_name(&self) -> &str {
        "docs"
    }

    async fn open_chat(&self, assistant_name: &str, messages: &[ChatTurn]) -> Result<ChatStream> {
        self.chats
            .lock()
            .unwrap()
            .push((assistant_name.to_string(), messages.len()));

        if let Some((status, message)) = &self.reject {
            return Err(ClientError::Upstream {
                status: *status,
                message: message.clone(),
            });
        }
        if self.hang {
            return Ok(ChatStream::from_byte_stream(
                stream::pending::<std::result::Result<Vec<u8>, StreamError>>(),
            ));
        }

        let chunks: Vec<std::result::Result<Vec<u8>, StreamError>> = self
            .chunks
            .iter()
            .map(|c| Ok(c.as_bytes().to_vec()))
            .collect();
        Ok(ChatStream::from_byte_stream(stream::iter(chunks)))
    }

    async fn list_files(&self, _assistant_name: &str) -> Result<Vec<FileDescriptor>> {
        Ok(self.files.clone())
    }

    async fn upload_file(
        &self,
        _assistant_name: &str,
        upload: FileUpload,
    ) -> Result<FileDescriptor> {
        let descriptor = FileDescriptor {
            id: format!("file-{}", upload.file_name),
            name: upload.file_name.clone(),
            size_bytes: Some(upload.bytes.len() as u64),
            created_at: None,
            status: Some("Processing".to_string()),
        };
        self.uploads.lock().unwrap().push(upload);
        Ok(descriptor)
    }

    async fn list_assistants(&self) -> Result<Vec<AssistantInfo>> {
        Ok(self
            .assistants
            .iter()
            .map(|name| AssistantInfo {
                name: name.clone(),
                status: Some("Ready".to_string()),
                extra: serde_json::Map::new(),
            })
            .collect())
    }

    async fn create_assistant(&self, request: &CreateAssistant) -> Result<AssistantInfo> {
        Ok(AssistantInfo {
            name: request.name.clone(),
            status: None,
            extra: serde_json::Map::new(),
        })
    }
}
