// src/handlers/history.rs

use crate::error::{AppError, Result};
use crate::models::Heartbeat;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const MAX_HISTORY_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// `GET /api/monitors/:id/heartbeats?limit=N`: recent heartbeats, newest first.
/// Limits above the maximum are clamped.
pub async fn history_handler(
    State(state): State<Arc<AppState>>,
    Path(monitor_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Heartbeat>>> {
    let limit = match query.limit {
        Some(0) => return Err(AppError::BadRequest("limit must be at least 1".to_string())),
        Some(n) => n.min(MAX_HISTORY_LIMIT),
        None => DEFAULT_HISTORY_LIMIT,
    };

    let known = state
        .store
        .list_monitors()
        .await?
        .iter()
        .any(|m| m.id == monitor_id);
    if !known {
        return Err(AppError::UnknownMonitor(monitor_id));
    }

    let heartbeats = state.store.recent_heartbeats(&monitor_id, 0, limit).await?;
    Ok(Json(heartbeats))
}
