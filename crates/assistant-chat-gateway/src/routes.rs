//! Router configuration.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use assistant_chat_client::AssistantApi;

use crate::handlers::{assistants, chat, files, health};
use crate::state::GatewayState;

/// Create the gateway router with all routes and middleware.
///
/// # Routes
///
/// - `GET /health` - Health check
/// - `POST /api/chat` - Chat turn (SSE or accumulated JSON)
/// - `GET /api/files` - List files
/// - `POST /api/files` - Upload a file (multipart)
/// - `GET /api/assistants` - Check that the assistant exists
/// - `POST /api/assistants` - Create an assistant
///
/// Endpoints taking an assistant accept `?assistant_name=` (or
/// `assistant_name` in the chat body) to override the configured one.
pub fn create_router<A>(state: GatewayState<A>) -> Router
where
    A: AssistantApi + 'static,
{
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout = state.config.request_timeout();

    let state = Arc::new(state);

    // Chat applies its own deadline in the handler.
    let timed = Router::new()
        .route(
            "/api/files",
            get(files::list_files::<A>).post(files::upload_file::<A>),
        )
        .route(
            "/api/assistants",
            get(assistants::check_assistant::<A>).post(assistants::create_assistant::<A>),
        )
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .route("/health", get(health::health))
        .route("/api/chat", post(chat::chat::<A>))
        .merge(timed)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // The tower-http limit replaces axum's 2 MB extractor default.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
