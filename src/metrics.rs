// src/metrics.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Duration;

use crate::config::StatusMode;
use crate::error::{AppError, Result};
use crate::models::MonitorStatus;
use crate::state::AppState;

/// Installs the global Prometheus recorder. Call once per process.
pub fn initialize_metrics() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| AppError::Internal(format!("failed to install Prometheus recorder: {e}")))
}

pub fn record_pulse_accepted(monitor_id: &str, status: MonitorStatus) {
    counter!(
        "pulse_status_pulses_total",
        "monitor" => monitor_id.to_string(),
        "status" => status.as_str()
    )
    .increment(1);
}

pub fn record_pulse_rejected(reason: &'static str) {
    counter!("pulse_status_pulses_rejected_total", "reason" => reason).increment(1);
}

pub fn record_status_read(mode: StatusMode) {
    let mode = match mode {
        StatusMode::Store => "store",
        StatusMode::Live => "live",
    };
    counter!("pulse_status_status_reads_total", "mode" => mode).increment(1);
}

pub fn record_probe(kind: &'static str, up: bool, elapsed: Duration) {
    let outcome = if up { "up" } else { "down" };
    counter!("pulse_status_probes_total", "kind" => kind, "outcome" => outcome).increment(1);
    histogram!("pulse_status_probe_duration_seconds", "kind" => kind).record(elapsed.as_secs_f64());
}

/// `GET /metrics`: Prometheus text, or 404 when no recorder is installed.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}
