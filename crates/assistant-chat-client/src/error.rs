//! Error types for upstream operations.

use thiserror::Error;

/// A result type using `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Missing or invalid configuration. Always raised before any request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required environment variable is absent or blank.
    #[error("{0} is not set")]
    Missing(&'static str),
}

/// Errors from the upstream assistant API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration was incomplete.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The endpoint could not be reached.
    #[error("connection failed: {0}")]
    Connection(#[from] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("upstream error ({status}): {message}")]
    Upstream {
        /// HTTP status code returned by the upstream.
        status: u16,
        /// Upstream message, or the raw body when it had none.
        message: String,
    },

    /// The upstream answered successfully but the body was not understood.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// A local file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// The upstream HTTP status, if the upstream produced one.
    #[must_use]
    pub const fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors that end a chat stream early.
///
/// All variants are fatal to the turn; the caller keeps whatever content
/// already arrived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The connection failed while reading the stream.
    #[error("stream transport error: {0}")]
    Transport(String),

    /// The stream was cancelled by the caller.
    #[error("stream cancelled")]
    Cancelled,

    /// The upstream closed the stream without a finish signal.
    #[error("stream ended before the reply finished")]
    Incomplete,
}
