// src/handlers/health.rs

use crate::core::HealthReport;
use crate::state::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// `GET /health`: liveness only, never touches the store.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    Json(state.health.report())
}
