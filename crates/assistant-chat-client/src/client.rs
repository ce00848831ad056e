//! HTTP client for the hosted assistant API.
//!
//! [`AssistantApi`] is the seam the gateway and terminal front end program
//! against; [`AssistantClient`] is the reqwest implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use assistant_chat_core::{ChatTurn, FileDescriptor};

use crate::config::AssistantConfig;
use crate::error::{ClientError, Result};
use crate::files::{normalize_file, normalize_file_list};
use crate::stream::ChatStream;
use crate::types::{AssistantInfo, ChatRequest, CreateAssistant, FileUpload, ListAssistantsResponse};

/// Authentication header expected by the upstream.
pub const API_KEY_HEADER: &str = "Api-Key";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Applies to every call except the chat stream, which may run long.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Operations against the hosted assistant.
///
/// Abstracted so front ends can be tested against an in-memory fake.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Name of the configured default assistant.
    fn assistant_name(&self) -> &str;

    /// Open a streaming chat turn with the given history.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] if the endpoint is unreachable
    /// and [`ClientError::Upstream`] on a non-success status, before any
    /// event is produced.
    async fn open_chat(&self, assistant_name: &str, messages: &[ChatTurn]) -> Result<ChatStream>;

    /// List the files attached to an assistant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the listing is malformed.
    async fn list_files(&self, assistant_name: &str) -> Result<Vec<FileDescriptor>>;

    /// Attach a file to an assistant.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Upstream`] with the upstream status and
    /// message if the upload is rejected.
    async fn upload_file(&self, assistant_name: &str, upload: FileUpload)
        -> Result<FileDescriptor>;

    /// List all assistants visible to the credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the listing is malformed.
    async fn list_assistants(&self) -> Result<Vec<AssistantInfo>>;

    /// Whether an assistant with this name exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the assistant listing cannot be fetched.
    async fn assistant_exists(&self, assistant_name: &str) -> Result<bool> {
        let assistants = self.list_assistants().await?;
        Ok(assistants.iter().any(|a| a.name == assistant_name))
    }

    /// Create an assistant.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Upstream`] if the upstream rejects the request.
    async fn create_assistant(&self, request: &CreateAssistant) -> Result<AssistantInfo>;
}

/// reqwest-backed [`AssistantApi`].
#[derive(Debug, Clone)]
pub struct AssistantClient {
    client: reqwest::Client,
    config: AssistantConfig,
}

impl AssistantClient {
    /// Create a client with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] if the HTTP client cannot be
    /// built.
    pub fn new(config: AssistantConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a client around an existing reqwest client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: AssistantConfig) -> Self {
        Self { client, config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .timeout(REQUEST_TIMEOUT)
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header(API_KEY_HEADER, &self.config.api_key)
    }

    /// Turn a non-success response into [`ClientError::Upstream`].
    ///
    /// The message is taken from `message`, `error.message` or a string
    /// `error` field, falling back to the raw body.
    async fn handle_error(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = upstream_message(&body)
            .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
            .or_else(|| status.canonical_reason().map(String::from))
            .unwrap_or_else(|| "Unknown error".to_string());

        tracing::error!(status = status.as_u16(), message = %message, "Upstream request failed");
        ClientError::Upstream {
            status: status.as_u16(),
            message,
        }
    }

    async fn json_body(response: reqwest::Response) -> Result<Value> {
        if !response.status().is_success() {
            return Err(Self::handle_error(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

fn upstream_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let error = value.get("error");
    value
        .get("message")
        .or_else(|| error.and_then(|e| e.get("message")))
        .or(error)
        .and_then(Value::as_str)
        .map(String::from)
}

#[async_trait]
impl AssistantApi for AssistantClient {
    fn assistant_name(&self) -> &str {
        &self.config.assistant_name
    }

    async fn open_chat(&self, assistant_name: &str, messages: &[ChatTurn]) -> Result<ChatStream> {
        let url = self.config.chat_url_for(assistant_name);
        tracing::debug!(assistant = %assistant_name, turns = messages.len(), "Opening chat stream");

        let response = self
            .post(&url)
            .header(ACCEPT, "text/event-stream")
            .json(&ChatRequest {
                stream: true,
                messages,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::handle_error(response).await);
        }

        Ok(ChatStream::from_response(response))
    }

    async fn list_files(&self, assistant_name: &str) -> Result<Vec<FileDescriptor>> {
        let url = self.config.files_url_for(assistant_name);
        let response = self.get(&url).send().await?;
        let body = Self::json_body(response).await?;
        let files = normalize_file_list(body)?;
        tracing::debug!(assistant = %assistant_name, count = files.len(), "Listed files");
        Ok(files)
    }

    async fn upload_file(
        &self,
        assistant_name: &str,
        upload: FileUpload,
    ) -> Result<FileDescriptor> {
        let url = self.config.files_url_for(assistant_name);
        let size = upload.bytes.len();

        let mut part = Part::bytes(upload.bytes).file_name(upload.file_name.clone());
        if let Some(content_type) = &upload.content_type {
            part = match part.mime_str(content_type) {
                Ok(part) => part,
                Err(e) => {
                    return Err(ClientError::Parse(format!(
                        "invalid content type '{content_type}': {e}"
                    )))
                }
            };
        }
        let mut form = Form::new().part("file", part);
        if let Some(metadata) = &upload.metadata {
            form = form.text("metadata", metadata.to_string());
        }

        tracing::info!(assistant = %assistant_name, file = %upload.file_name, size, "Uploading file");
        let response = self
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .multipart(form)
            .send()
            .await?;
        let body = Self::json_body(response).await?;

        normalize_file(&body)
            .ok_or_else(|| ClientError::Parse("upload response has no file id".to_string()))
    }

    async fn list_assistants(&self) -> Result<Vec<AssistantInfo>> {
        let response = self.get(&self.config.assistants_url()).send().await?;
        let body = Self::json_body(response).await?;
        let listing: ListAssistantsResponse = serde_json::from_value(body)
            .map_err(|e| ClientError::Parse(format!("unexpected assistant listing: {e}")))?;
        Ok(listing.assistants)
    }

    async fn create_assistant(&self, request: &CreateAssistant) -> Result<AssistantInfo> {
        tracing::info!(assistant = %request.name, "Creating assistant");
        let response = self
            .post(&self.config.assistants_url())
            .timeout(REQUEST_TIMEOUT)
            .json(&request.to_wire())
            .send()
            .await?;
        let body = Self::json_body(response).await?;
        serde_json::from_value(body).map_err(|e| ClientError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_shapes() {
        assert_eq!(
            upstream_message(r#"{"message":"not found"}"#).as_deref(),
            Some("not found")
        );
        assert_eq!(
            upstream_message(r#"{"error":{"code":"NOT_FOUND","message":"no such assistant"}}"#)
                .as_deref(),
            Some("no such assistant")
        );
        assert_eq!(
            upstream_message(r#"{"error":"bad key"}"#).as_deref(),
            Some("bad key")
        );
        assert_eq!(upstream_message("<html>oops</html>"), None);
    }
}
