// src/handlers/status.rs

use crate::config::StatusMode;
use crate::core::to_status_entry;
use crate::error::Result;
use crate::metrics;
use crate::models::StatusEntry;
use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// `GET /api/status`: one entry per system, from the store or from live
/// probes depending on `status.mode`.
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<Vec<StatusEntry>>> {
    let mode = state.config.status.mode;
    metrics::record_status_read(mode);

    let entries = match mode {
        StatusMode::Store => stored_status(&state, Utc::now().timestamp_millis()).await?,
        StatusMode::Live => state.prober.probe_systems().await,
    };
    debug!(?mode, systems = entries.len(), "Status assembled");
    Ok(Json(entries))
}

/// Reads every monitor from the store as of `now_ms`, applying the staleness
/// override and the uptime window.
pub async fn stored_status(state: &AppState, now_ms: i64) -> Result<Vec<StatusEntry>> {
    let staleness = state.config.pulse.staleness_window();
    let uptime_window_ms = i64::try_from(state.config.pulse.uptime_window().as_millis())
        .unwrap_or(i64::MAX);
    let since_ms = now_ms.saturating_sub(uptime_window_ms);

    let monitors = state.store.list_monitors().await?;
    let mut entries = Vec::with_capacity(monitors.len());
    for monitor in &monitors {
        let summary = state.store.heartbeat_summary(&monitor.id, since_ms).await?;
        entries.push(to_status_entry(monitor, &summary, now_ms, staleness));
    }
    Ok(entries)
}
