//! HTTP API for the liqmap daemon.
//!
//! Provides REST endpoints for:
//! - Health check
//! - Webhook (run the pipeline once and return the top liquidation zones)

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use liqmap_domain::HeatmapResult;

use crate::error::PipelineError;
use crate::pipeline::Pipeline;

// =============================================================================
// API State
// =============================================================================

/// Shared state for API handlers.
pub struct ApiState {
    pub pipeline: Arc<Pipeline>,
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// =============================================================================
// Router
// =============================================================================

/// Create the API router.
pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/webhook", post(webhook_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Run the pipeline once and return the top zones.
async fn webhook_handler(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<HeatmapResult>, (StatusCode, Json<ErrorResponse>)> {
    let result = state.pipeline.run().await.map_err(to_error_response)?;

    info!(
        long_liq = result.long_liq,
        short_liq = result.short_liq,
        "Webhook"
    );

    Ok(Json(result))
}

// =============================================================================
// Helpers
// =============================================================================

fn to_error_response(error: PipelineError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &error {
        PipelineError::NoData => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

// =============================================================================
// Tests
// =============================================================================
