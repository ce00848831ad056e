//! Gateway application state.

use std::sync::Arc;

use assistant_chat_client::AssistantApi;

use crate::config::GatewayConfig;

/// Shared application state for the gateway.
pub struct GatewayState<A>
where
    A: AssistantApi,
{
    /// Upstream assistant API.
    pub api: Arc<A>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<A> GatewayState<A>
where
    A: AssistantApi,
{
    /// Create a new gateway state.
    #[must_use]
    pub fn new(api: Arc<A>, config: GatewayConfig) -> Self {
        Self { api, config }
    }

    /// The assistant a request targets: the requested name when non-blank,
    /// else the configured one.
    #[must_use]
    pub fn resolve_assistant(&self, requested: Option<&str>) -> String {
        requested
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.api.assistant_name())
            .to_string()
    }
}

impl<A> Clone for GatewayState<A>
where
    A: AssistantApi,
{
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            config: self.config.clone(),
        }
    }
}
