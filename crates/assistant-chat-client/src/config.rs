//! Upstream connection configuration.
//!
//! Credentials and the target assistant come from the environment. Both are
//! required; a missing value is reported before any request is attempted.

use std::fmt;

use crate::error::ConfigError;

/// Credential for the upstream API.
pub const API_KEY_VAR: &str = "PINECONE_API_KEY";
/// Name of the assistant to chat with.
pub const ASSISTANT_NAME_VAR: &str = "PINECONE_ASSISTANT_NAME";
/// Optional full URL replacing the derived chat endpoint.
pub const CHAT_ENDPOINT_VAR: &str = "PINECONE_ASSISTANT_CHAT_ENDPOINT";
/// Optional API base URL.
pub const BASE_URL_VAR: &str = "PINECONE_API_BASE_URL";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.pinecone.io";

/// Configuration for talking to the hosted assistant.
#[derive(Clone)]
pub struct AssistantConfig {
    /// Value of the `Api-Key` header.
    pub api_key: String,
    /// Path segment identifying the assistant.
    pub assistant_name: String,
    /// API base URL, without trailing slash.
    pub base_url: String,
    /// Full chat URL overriding the derived one.
    pub chat_endpoint: Option<String>,
}

impl AssistantConfig {
    /// Build a configuration against the default base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if either value is blank.
    pub fn new(
        api_key: impl Into<String>,
        assistant_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self::from_parts(Some(api_key.into()), Some(assistant_name.into()))
    }

    /// Build a configuration from optional parts, treating blank values as
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming the first absent variable.
    pub fn from_parts(
        api_key: Option<String>,
        assistant_name: Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = non_blank(api_key).ok_or(ConfigError::Missing(API_KEY_VAR))?;
        let assistant_name =
            non_blank(assistant_name).ok_or(ConfigError::Missing(ASSISTANT_NAME_VAR))?;

        Ok(Self {
            api_key,
            assistant_name,
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_endpoint: None,
        })
    }

    /// Load from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if the credential or assistant name
    /// is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if the credential or assistant name
    /// is not set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = Self::from_parts(lookup(API_KEY_VAR), lookup(ASSISTANT_NAME_VAR))?;
        let config = match non_blank(lookup(BASE_URL_VAR)) {
            Some(base_url) => config.with_base_url(base_url),
            None => config,
        };
        Ok(config.with_chat_endpoint(lookup(CHAT_ENDPOINT_VAR)))
    }

    /// Replace the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set or clear the chat endpoint override.
    #[must_use]
    pub fn with_chat_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.chat_endpoint = non_blank(endpoint);
        self
    }

    /// Chat URL for the configured assistant.
    #[must_use]
    pub fn chat_url(&self) -> String {
        self.chat_url_for(&self.assistant_name)
    }

    /// Chat URL for a named assistant; the override wins when set.
    #[must_use]
    pub fn chat_url_for(&self, assistant_name: &str) -> String {
        match &self.chat_endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("{}/chat", self.assistant_url(assistant_name)),
        }
    }

    /// Files URL for the configured assistant.
    #[must_use]
    pub fn files_url(&self) -> String {
        self.files_url_for(&self.assistant_name)
    }

    /// Files URL for a named assistant.
    #[must_use]
    pub fn files_url_for(&self, assistant_name: &str) -> String {
        format!("{}/files", self.assistant_url(assistant_name))
    }

    /// URL of the assistant collection.
    #[must_use]
    pub fn assistants_url(&self) -> String {
        format!("{}/assistant/assistants", self.base_url)
    }

    fn assistant_url(&self, assistant_name: &str) -> String {
        format!("{}/{assistant_name}", self.assistants_url())
    }
}

impl fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("api_key", &"<redacted>")
            .field("assistant_name", &self.assistant_name)
            .field("base_url", &self.base_url)
            .field("chat_endpoint", &self.chat_endpoint)
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
