//! Core types and stream handling for assistant-chat.
//!
//! This crate provides the I/O-free foundation shared by the client, gateway
//! and terminal front end:
//!
//! - **Identifiers**: [`MessageId`] for transcript entries
//! - **Data model**: messages, citations and file metadata
//! - **Stream decoding**: server-sent-event framing and payload classification
//! - **Transcript**: the accumulator that folds stream events into messages
//!
//! # Example
//!
//! ```
//! use assistant_chat_core::{decode_payload, Transcript};
//!
//! let mut transcript = Transcript::new();
//! let history = transcript.submit("Hello").unwrap();
//! assert_eq!(history.len(), 1);
//!
//! for data in [
//!     r#"{"choices":[{"delta":{"content":"Hi"}}]}"#,
//!     r#"{"choices":[{"delta":{"content":" there"}}]}"#,
//!     r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#,
//! ] {
//!     for event in decode_payload(data) {
//!         transcript.apply(&event);
//!     }
//! }
//!
//! assert_eq!(transcript.messages()[1].content, "Hi there");
//! assert!(!transcript.is_awaiting());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod decode;
pub mod error;
pub mod event;
pub mod ids;
pub mod message;
pub mod sse;
pub mod transcript;

pub use decode::{decode_payload, normalize_reference, DONE_SENTINEL};
pub use error::TranscriptError;
pub use event::StreamEvent;
pub use ids::{IdError, MessageId};
pub use message::{ChatTurn, FileDescriptor, Message, Reference, Role};
pub use sse::SseFramer;
pub use transcript::{apply, Applied, Transcript, TurnState};
