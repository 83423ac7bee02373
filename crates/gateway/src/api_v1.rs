//! HTTP API v1.
//!
//! Endpoints:
//!
//! - `GET  /v1/settings`         — what the sidebar shows
//! - `GET  /v1/provider/health`  — "Verify Connection"
//! - `POST /v1/runs`             — run the pipeline, return the final state

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use scribeloop_core::ApprovalMode;
use scribeloop_core::error::PipelineError;
use scribeloop_core::provider::ProviderHealth;
use scribeloop_core::run::RunState;

use crate::SharedState;

/// Build the v1 API router. Nest this under "/v1" in the main router.
pub fn v1_router(state: SharedState) -> Router {
    Router::new()
        .route("/settings", get(settings_handler))
        .route("/provider/health", get(provider_health_handler))
        .route("/runs", post(create_run_handler))
        .with_state(state)
}

// ── DTOs ──────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug)]
pub struct SettingsResponse {
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub search_backend: String,
    pub max_revisions: u32,
    pub approval_mode: ApprovalMode,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ProviderHealthResponse {
    /// "connected", "warning" or "failed"
    pub status: String,
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub topic: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    /// "validation" or "generation"
    pub kind: String,
    pub error: String,
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn settings_handler(State(state): State<SharedState>) -> Json<SettingsResponse> {
    let pipeline = &state.pipeline;
    let settings = pipeline.settings();
    Json(SettingsResponse {
        provider: pipeline.provider().name().to_string(),
        endpoint: pipeline.provider().endpoint().to_string(),
        model: settings.generation.model.clone(),
        temperature: settings.generation.temperature,
        search_backend: pipeline.search().name().to_string(),
        max_revisions: settings.max_revisions,
        approval_mode: settings.approval_mode,
    })
}

async fn provider_health_handler(State(state): State<SharedState>) -> Json<ProviderHealthResponse> {
    let provider = state.pipeline.provider();
    let endpoint = provider.endpoint().to_string();

    let response = match provider.health_check().await {
        Ok(ProviderHealth::Connected) => ProviderHealthResponse {
            status: "connected".into(),
            endpoint,
            status_code: None,
            message: None,
        },
        Ok(ProviderHealth::Unexpected { status_code }) => ProviderHealthResponse {
            status: "warning".into(),
            endpoint,
            status_code: Some(status_code),
            message: Some(format!("Status Code: {status_code}")),
        },
        Err(e) => {
            warn!(error = %e, "Provider health check failed");
            ProviderHealthResponse {
                status: "failed".into(),
                endpoint,
                status_code: None,
                message: Some(format!("Connection Failed: {e}")),
            }
        }
    };

    Json(response)
}

async fn create_run_handler(
    State(state): State<SharedState>,
    Json(payload): Json<RunRequest>,
) -> Result<Json<RunState>, (StatusCode, Json<ErrorResponse>)> {
    info!(topic_len = payload.topic.len(), "v1/runs request");

    state.pipeline.run(&payload.topic).await.map(Json).map_err(|e| {
        let status = match e {
            PipelineError::EmptyTopic => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::Generation { .. } => StatusCode::BAD_GATEWAY,
        };
        (
            status,
            Json(ErrorResponse {
                kind: e.kind().to_string(),
                error: e.to_string(),
            }),
        )
    })
}
