// src/lib.rs

pub mod cli;
pub mod config;
pub mod core;
pub mod dashboard;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod probe;
pub mod reporter;
pub mod security;
pub mod state;
pub mod storage;

use crate::handlers::{health_check, history_handler, pulse_handler, status_handler};
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Request as AxumRequest},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{path::PathBuf, sync::Arc, time::Duration, time::Instant};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use state::AppState;

/// Builds the application router with its per-route layers.
///
/// Oversized bodies are refused twice: up front from `Content-Length`, and
/// while buffering for bodies that declare no length.
pub fn create_router(state: Arc<AppState>) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/pulse", post(pulse_handler))
        .route("/api/status", get(status_handler))
        .route("/api/monitors/:id/heartbeats", get(history_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics::metrics_handler))
        .layer(DefaultBodyLimit::max(crate::middleware::MAX_REQUEST_SIZE))
        .layer(axum::middleware::from_fn(
            crate::middleware::request_size_limit_middleware,
        ))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .with_state(state)
}

/// Tags every request with an id, traces it in a span and returns the id in
/// `X-Request-ID`.
pub async fn trace_requests(
    mut req: AxumRequest<Body>,
    next: axum::middleware::Next,
) -> impl IntoResponse {
    let request_id = Uuid::new_v4();
    let start_time = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let span = info_span!(
        "request",
        request_id = %request_id,
        http.method = %method,
        url.path = %path,
    );

    req.extensions_mut().insert(request_id);

    async move {
        let mut response = next.run(req).await;
        let elapsed = start_time.elapsed();

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert("X-Request-ID", value);
        }

        info!(
            http.response.duration = ?elapsed,
            http.status_code = response.status().as_u16(),
            "Finished processing request"
        );

        response
    }
    .instrument(span)
    .await
}

/// Loads configuration, builds the state and returns the fully layered router.
pub async fn run(
    config_path_override: Option<PathBuf>,
    metrics: Option<PrometheusHandle>,
) -> Result<(Router, AppConfig)> {
    info!("Starting pulse status server...");

    let app_config = setup_configuration(config_path_override)?;
    let app_state = build_application_state(&app_config, metrics).await?;

    let app = create_router(app_state).layer(axum::middleware::from_fn(trace_requests));

    Ok((app, app_config))
}

/// Resolves the config path: explicit override, then `CONFIG_PATH`, then
/// `config.yaml`.
pub fn resolve_config_path(config_path_override: Option<PathBuf>) -> PathBuf {
    config_path_override.unwrap_or_else(|| {
        std::env::var("CONFIG_PATH").map_or_else(|_| PathBuf::from("config.yaml"), PathBuf::from)
    })
}

/// Loads, validates and logs the application configuration.
pub fn setup_configuration(config_path_override: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(config_path_override);

    let config_path_display = config_path.display().to_string();
    if config_path.exists() {
        info!(config.path = %config_path_display, "Using configuration file");
    } else {
        info!(config.path = %config_path_display, "Optional configuration file not found. Using defaults and environment variables.");
    }

    let app_config = config::load_config(&config_path).map_err(|e| {
        error!(
            config.path = %config_path_display,
            error = ?e,
            "Failed to load or validate configuration. Exiting."
        );
        e
    })?;

    let monitor_ids: Vec<&str> = app_config.monitors.iter().map(|m| m.id.as_str()).collect();
    info!(
        config.monitors = ?monitor_ids,
        config.status_mode = ?app_config.status.mode,
        config.secret_configured = app_config.pulse.secret.is_some(),
        server.port = app_config.server.port,
        "Configuration loaded and validated successfully."
    );

    Ok(app_config)
}

/// Creates the application state, connecting and seeding the store.
pub async fn build_application_state(
    app_config: &AppConfig,
    metrics: Option<PrometheusHandle>,
) -> Result<Arc<AppState>> {
    let app_state = AppState::new(app_config, metrics).await.map_err(|e| {
        error!(error = ?e, "Failed to initialize application state. Exiting.");
        e
    })?;

    info!(
        storage.backend = app_state.store.backend_name(),
        "Application state initialized successfully."
    );
    Ok(Arc::new(app_state))
}
