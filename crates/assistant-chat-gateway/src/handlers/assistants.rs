//! Assistant management endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use assistant_chat_client::{AssistantApi, AssistantInfo, CreateAssistant};

use crate::error::ApiError;
use crate::handlers::AssistantQuery;
use crate::state::GatewayState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Response for the existence check.
#[derive(Debug, Serialize)]
pub struct AssistantStatusResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// Human-readable summary.
    pub message: String,
    /// Whether the assistant exists.
    pub exists: bool,
    /// The name that was checked.
    pub assistant_name: String,
}

/// Request to create an assistant.
#[derive(Debug, Deserialize)]
pub struct CreateAssistantBody {
    /// Name of the new assistant.
    #[serde(default)]
    pub assistant_name: Option<String>,
    /// System instructions.
    #[serde(default)]
    pub instructions: Option<String>,
    /// Model name.
    #[serde(default)]
    pub model: Option<String>,
    /// Deployment region.
    #[serde(default)]
    pub region: Option<String>,
}

/// Response for a created assistant.
#[derive(Debug, Serialize)]
pub struct CreateAssistantResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// Human-readable summary.
    pub message: String,
    /// The assistant as reported by the upstream.
    pub assistant: AssistantInfo,
}

// =============================================================================
// Handlers
// =============================================================================

/// Check whether the assistant exists.
pub async fn check_assistant<A>(
    State(state): State<Arc<GatewayState<A>>>,
    Query(query): Query<AssistantQuery>,
) -> Result<Json<AssistantStatusResponse>, ApiError>
where
    A: AssistantApi + 'static,
{
    let assistant_name = state.resolve_assistant(query.assistant_name.as_deref());
    let exists = state
        .api
        .assistant_exists(&assistant_name)
        .await
        .map_err(|e| ApiError::internal("Failed to check assistant", e))?;

    let message = if exists {
        format!("Assistant '{assistant_name}' exists")
    } else {
        format!("Assistant '{assistant_name}' not found")
    };
    Ok(Json(AssistantStatusResponse {
        status: "success",
        message,
        exists,
        assistant_name,
    }))
}

/// Create an assistant.
///
/// ```text
/// POST /api/assistants
/// { "assistant_name": "docs", "instructions": "Answer from the manuals." }
///
/// Response: 201 Created
/// { "status": "success", "message": "...", "assistant": { "name": "docs", ... } }
/// ```
pub async fn create_assistant<A>(
    State(state): State<Arc<GatewayState<A>>>,
    payload: Result<Json<CreateAssistantBody>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateAssistantResponse>), ApiError>
where
    A: AssistantApi + 'static,
{
    let Json(body) = payload
        .map_err(|_| ApiError::BadRequest("Invalid JSON in request body.".to_string()))?;
    let name = body
        .assistant_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::BadRequest("assistant_name is required".to_string()))?
        .to_string();

    let request = CreateAssistant {
        name: name.clone(),
        instructions: body.instructions,
        model: body.model,
        region: body.region,
    };
    let assistant = state
        .api
        .create_assistant(&request)
        .await
        .map_err(|e| ApiError::from_client("Failed to create assistant", e))?;

    tracing::info!(assistant = %name, "Assistant created");
    Ok((
        StatusCode::CREATED,
        Json(CreateAssistantResponse {
            status: "success",
            message: format!("Assistant '{name}' created"),
            assistant,
        }),
    ))
}
