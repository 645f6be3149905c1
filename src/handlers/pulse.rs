// src/handlers/pulse.rs

use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{Heartbeat, PulseRequest, PulseResponse};
use crate::middleware::MAX_REQUEST_SIZE;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// `POST /api/pulse`: accepts a heartbeat from a monitored service.
///
/// The secret is checked on the raw JSON before the typed fields are
/// validated, so a wrong or missing secret is always 401. Decoding failures
/// after that are server errors carrying the decoder message.
///
/// A heartbeat for a monitor that was never seeded is refused with 404 and
/// leaves no history row. Older reporters may expect 200 for such ids, which
/// used to store an orphan history row.
pub async fn pulse_handler(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<PulseResponse>> {
    let Json(body) = payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            metrics::record_pulse_rejected("too_large");
            return AppError::PayloadTooLarge {
                limit: MAX_REQUEST_SIZE,
            };
        }
        metrics::record_pulse_rejected("invalid_payload");
        AppError::InvalidPulse(rejection.body_text())
    })?;

    let provided = body.get("secret").and_then(Value::as_str).unwrap_or_default();
    if !state.auth.verify(provided) {
        metrics::record_pulse_rejected("unauthorized");
        let monitor_id = body.get("monitor_id").and_then(Value::as_str).unwrap_or("");
        warn!(monitor_id, "Heartbeat rejected: secret mismatch");
        return Err(AppError::Unauthorized);
    }

    let request: PulseRequest = serde_json::from_value(body).map_err(|e| {
        metrics::record_pulse_rejected("invalid_payload");
        AppError::InvalidPulse(e.to_string())
    })?;

    let timestamp = Utc::now().timestamp_millis();
    let heartbeat = Heartbeat {
        monitor_id: request.monitor_id,
        timestamp,
        latency: request.latency,
        status: request.status,
    };

    if let Err(e) = state.store.record_pulse(&heartbeat).await {
        let reason = match &e {
            AppError::UnknownMonitor(_) => "unknown_monitor",
            _ => "storage",
        };
        metrics::record_pulse_rejected(reason);
        return Err(e);
    }

    metrics::record_pulse_accepted(&heartbeat.monitor_id, heartbeat.status);
    info!(
        monitor_id = %heartbeat.monitor_id,
        status = %heartbeat.status,
        latency_ms = heartbeat.latency,
        "Heartbeat recorded"
    );

    Ok(Json(PulseResponse {
        success: true,
        timestamp,
    }))
}
