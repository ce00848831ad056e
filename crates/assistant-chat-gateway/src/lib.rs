//! HTTP gateway in front of the hosted assistant API.
//!
//! Browsers and other front ends talk to this service instead of the
//! upstream, so the API key never leaves the server. It handles:
//!
//! - Chat relay, as server-sent events or a single accumulated reply
//! - File listing and multipart upload
//! - Assistant existence checks and creation
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │     Browser / front end      │
//! └──────────────────────────────┘
//!                │ HTTP, SSE
//!                ▼
//! ┌──────────────────────────────┐
//! │    assistant-chat-gateway    │
//! │   Router + Handlers + Relay  │
//! └──────────────────────────────┘
//!                │ Api-Key
//!                ▼
//! ┌──────────────────────────────┐
//! │    Hosted assistant API      │
//! └──────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use assistant_chat_client::{AssistantClient, AssistantConfig};
//! use assistant_chat_gateway::{create_router, GatewayConfig, GatewayState};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = Arc::new(AssistantClient::new(AssistantConfig::from_env()?)?);
//! let state = GatewayState::new(api, GatewayConfig::default());
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::GatewayState;
