// src/state.rs

use crate::config::AppConfig;
use crate::core::HealthChecker;
use crate::error::Result;
use crate::probe::Prober;
use crate::security::PulseAuthenticator;
use crate::storage::{self, MonitorStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;

/// Shared application state handed to every Axum handler.
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn MonitorStore>,
    pub auth: PulseAuthenticator,
    pub prober: Prober,
    pub health: HealthChecker,
    /// Present only when the process installed the global Prometheus recorder.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Builds the store selected by `config` and seeds it.
    pub async fn new(config: &AppConfig, metrics: Option<PrometheusHandle>) -> Result<Self> {
        info!("Creating shared AppState...");
        let store = storage::build_store(config).await?;
        Self::with_store(config, store, metrics)
    }

    /// Builds the state around an already initialized store.
    pub fn with_store(
        config: &AppConfig,
        store: Arc<dyn MonitorStore>,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self> {
        let auth = PulseAuthenticator::new(config.pulse.secret.clone());
        let prober = Prober::new(&config.probes)?;

        Ok(Self {
            config: config.clone(),
            store,
            auth,
            prober,
            health: HealthChecker::new(),
            metrics,
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.backend_name())
            .field("auth", &self.auth)
            .field("status_mode", &self.config.status.mode)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
