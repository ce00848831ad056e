//! Transcript error types.

use thiserror::Error;

/// Errors raised when a transcript rejects an input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptError {
    /// A reply is still streaming; only one assistant message may be open.
    #[error("a response is still streaming")]
    Busy,

    /// The submitted input was empty or whitespace.
    #[error("message content must not be empty")]
    EmptyInput,
}
