//! HTTP gateway for Scribeloop.
//!
//! Serves the embedded front end and a small JSON API:
//!
//! - `GET  /`                    — front end
//! - `GET  /health`              — gateway liveness
//! - `GET  /v1/settings`         — effective provider/search/pipeline settings
//! - `GET  /v1/provider/health`  — probe the configured provider
//! - `POST /v1/runs`             — run the pipeline for one topic
//!
//! Built on Axum.

pub mod api_v1;
pub mod frontend;

use axum::{Router, response::Json, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use scribeloop_config::AppConfig;
use scribeloop_pipeline::Pipeline;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub pipeline: Arc<Pipeline>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/v1", api_v1::v1_router(state))
        .merge(frontend::frontend_router())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let pipeline = Arc::new(Pipeline::from_config(&config)?);
    info!(
        provider = pipeline.provider().name(),
        endpoint = pipeline.provider().endpoint(),
        model = %config.provider.model,
        search = pipeline.search().name(),
        "Pipeline ready"
    );

    let state = Arc::new(GatewayState { pipeline });
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
