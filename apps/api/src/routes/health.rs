use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `degraded` when no generative model is configured.
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub vocabulary_size: usize,
    pub embedding_backend: &'static str,
    pub generator_configured: bool,
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let generator_configured = state.analyzer.generator_enabled();
    Json(HealthResponse {
        status: if generator_configured { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        service: env!("CARGO_PKG_NAME"),
        vocabulary_size: state.analyzer.vocabulary_size(),
        embedding_backend: state.analyzer.backends().embedding,
        generator_configured,
    })
}
