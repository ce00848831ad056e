//! Assistant chat gateway.
//!
//! Reads `PINECONE_API_KEY` and `PINECONE_ASSISTANT_NAME` (plus the optional
//! `PINECONE_ASSISTANT_CHAT_ENDPOINT` and `PINECONE_API_BASE_URL`) and
//! serves the chat, files and assistant endpoints on `LISTEN_ADDR`.
//! Startup fails if the credential or assistant name is missing.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assistant_chat_client::{AssistantClient, AssistantConfig};
use assistant_chat_gateway::{create_router, GatewayConfig, GatewayState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,assistant_chat=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting assistant chat gateway");

    let assistant_config = AssistantConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "Upstream configuration incomplete");
        e
    })?;
    let gateway_config = GatewayConfig::default().with_lookup(|key| std::env::var(key).ok());

    tracing::info!(
        listen_addr = %gateway_config.listen_addr,
        assistant = %assistant_config.assistant_name,
        base_url = %assistant_config.base_url,
        chat_endpoint = ?assistant_config.chat_endpoint,
        "Gateway configuration loaded"
    );

    let api = Arc::new(AssistantClient::new(assistant_config)?);
    let listen_addr = gateway_config.listen_addr.clone();
    let app = create_router(GatewayState::new(api, gateway_config));

    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
