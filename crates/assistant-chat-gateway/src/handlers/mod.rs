//! HTTP request handlers.

pub mod assistants;
pub mod chat;
pub mod files;
pub mod health;

use serde::Deserialize;

/// Optional `?assistant_name=` override shared by several endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct AssistantQuery {
    /// Assistant to target instead of the configured one.
    #[serde(default)]
    pub assistant_name: Option<String>,
}
