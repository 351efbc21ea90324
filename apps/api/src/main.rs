mod compliance;
mod config;
mod errors;
mod layout;
mod llm_client;
mod render;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::compliance::{AssessmentPolicy, ComplianceAssessmentService};
use crate::config::Config;
use crate::layout::default_page_config;
use crate::llm_client::LlmClient;
use crate::render::DocumentRenderer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.anthropic_api_url.clone(),
        config.llm_timeout,
    )
    .context("failed to build LLM HTTP client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let policy = AssessmentPolicy {
        timeout: config.llm_timeout,
        transport_retries: config.llm_transport_retries,
    };
    info!(
        timeout_secs = policy.timeout.as_secs(),
        transport_retries = policy.transport_retries,
        "Compliance assessment policy"
    );
    let assessor = ComplianceAssessmentService::new(Arc::new(llm), policy);

    let renderer = DocumentRenderer::new(default_page_config());
    info!(
        "Page config: {} {}pt, {} lines per page",
        renderer.page_config().font.base_font,
        renderer.page_config().font_size_pt,
        renderer.page_config().lines_per_page()
    );

    // Build app state
    let state = AppState {
        assessor: Arc::new(assessor),
        renderer: Arc::new(renderer),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict allowed origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
