//! File directory endpoints.

use std::sync::Arc;

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use assistant_chat_client::{AssistantApi, FileUpload};
use assistant_chat_core::FileDescriptor;

use crate::error::ApiError;
use crate::handlers::AssistantQuery;
use crate::state::GatewayState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Response for the file listing.
#[derive(Debug, Serialize)]
pub struct ListFilesResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// Human-readable summary.
    pub message: String,
    /// Files attached to the assistant.
    pub files: Vec<FileDescriptor>,
}

/// Response for a completed upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// Human-readable summary.
    pub message: String,
    /// Descriptor assigned by the upstream.
    pub file_info: FileDescriptor,
}

// =============================================================================
// Handlers
// =============================================================================

/// List the files attached to the assistant.
///
/// ```text
/// GET /api/files?assistant_name=docs
///
/// Response: 200 OK
/// { "status": "success", "message": "Found 1 file(s)", "files": [...] }
/// ```
pub async fn list_files<A>(
    State(state): State<Arc<GatewayState<A>>>,
    Query(query): Query<AssistantQuery>,
) -> Result<Json<ListFilesResponse>, ApiError>
where
    A: AssistantApi + 'static,
{
    let assistant = state.resolve_assistant(query.assistant_name.as_deref());
    let files = state
        .api
        .list_files(&assistant)
        .await
        .map_err(|e| ApiError::internal("Failed to list files", e))?;

    Ok(Json(ListFilesResponse {
        status: "success",
        message: format!("Found {} file(s)", files.len()),
        files,
    }))
}

/// Attach a file to the assistant.
///
/// Expects a multipart body with a `file` part and an optional `metadata`
/// part holding a JSON document. Invalid metadata is rejected before the
/// upstream is contacted; an upstream rejection keeps its status.
pub async fn upload_file<A>(
    State(state): State<Arc<GatewayState<A>>>,
    Query(query): Query<AssistantQuery>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError>
where
    A: AssistantApi + 'static,
{
    let mut upload: Option<FileUpload> = None;
    let mut metadata: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        match field.name().map(String::from).as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(String::from);
                let bytes = field.bytes().await.map_err(invalid_multipart)?;
                upload = Some(FileUpload {
                    file_name,
                    bytes: bytes.to_vec(),
                    content_type,
                    metadata: None,
                });
            }
            Some("metadata") => {
                metadata = Some(field.text().await.map_err(invalid_multipart)?);
            }
            other => tracing::debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    let mut upload = upload.ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;
    upload.metadata = parse_metadata(metadata.as_deref())?;

    let assistant = state.resolve_assistant(query.assistant_name.as_deref());
    let file_name = upload.file_name.clone();
    let file_info = state
        .api
        .upload_file(&assistant, upload)
        .await
        .map_err(|e| ApiError::from_client("Failed to upload file", e))?;

    tracing::info!(assistant = %assistant, file_id = %file_info.id, "File uploaded");
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            status: "success",
            message: format!("File '{file_name}' uploaded"),
            file_info,
        }),
    ))
}

fn parse_metadata(raw: Option<&str>) -> Result<Option<Value>, ApiError> {
    match raw.map(str::trim).filter(|m| !m.is_empty()) {
        None => Ok(None),
        Some(raw) => serde_json::from_str(raw)
            .map(Some)
            .map_err(|_| ApiError::BadRequest("Invalid metadata JSON".to_string())),
    }
}

#[allow(clippy::needless_pass_by_value)]
fn invalid_multipart(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(format!("Invalid multipart body: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_parsing() {
        assert_eq!(parse_metadata(None).unwrap(), None);
        assert_eq!(parse_metadata(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_metadata(Some(r#"{"team":"docs"}"#)).unwrap(),
            Some(serde_json::json!({"team": "docs"}))
        );
        assert!(matches!(
            parse_metadata(Some("{oops")),
            Err(ApiError::BadRequest(_))
        ));
    }
}
