//! Upstream client for the hosted assistant API.
//!
//! This crate talks to the assistant service over HTTP:
//!
//! - [`AssistantConfig`]: credentials and endpoint derivation
//! - [`AssistantApi`] / [`AssistantClient`]: chat, files and assistant management
//! - [`ChatStream`]: the pull-based, cancellable event stream of one chat turn
//! - [`relay_turn`]: folds a stream into a [`assistant_chat_core::Transcript`]

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod config;
pub mod error;
pub mod files;
pub mod relay;
pub mod stream;
pub mod types;

pub use client::{AssistantApi, AssistantClient, API_KEY_HEADER};
pub use config::AssistantConfig;
pub use error::{ClientError, ConfigError, Result, StreamError};
pub use files::normalize_file_list;
pub use relay::{collect_reply, relay_turn};
pub use stream::{ByteStream, CancelHandle, ChatStream};
pub use types::{AssistantInfo, CreateAssistant, FileUpload};
