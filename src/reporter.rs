// src/reporter.rs

use crate::error::{AppError, Result};
use crate::models::{MonitorStatus, PulseRequest, PulseResponse};
use crate::probe::Prober;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tracing::{debug, info};

/// Sends heartbeats to a status server on behalf of a monitored service.
pub struct PulseClient {
    client: Client,
    endpoint: String,
    secret: Secret<String>,
}

impl PulseClient {
    pub fn new(base_url: &str, secret: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AppError::HttpClientBuildError)?;
        Ok(Self {
            client,
            endpoint: format!("{}/api/pulse", base_url.trim_end_matches('/')),
            secret: Secret::new(secret),
        })
    }

    /// Posts one heartbeat. Non-2xx answers become `UpstreamStatus`.
    pub async fn send(
        &self,
        monitor_id: &str,
        status: MonitorStatus,
        latency_ms: u64,
    ) -> Result<PulseResponse> {
        let body = PulseRequest {
            monitor_id: monitor_id.to_string(),
            latency: latency_ms,
            status,
            secret: self.secret.expose_secret().clone(),
        };

        debug!(endpoint = %self.endpoint, monitor_id, %status, "Sending heartbeat");
        let resp = self.client.post(&self.endpoint).json(&body).send().await?;
        if !resp.status().is_success() {
            return Err(AppError::UpstreamStatus {
                status: resp.status(),
            });
        }

        let accepted: PulseResponse = resp.json().await?;
        info!(monitor_id, %status, latency_ms, timestamp = accepted.timestamp, "Heartbeat accepted");
        Ok(accepted)
    }

    /// Measures `target` with a HEAD probe and reports the result: `up` with
    /// the measured latency, or `down` with zero latency.
    pub async fn send_probed(
        &self,
        prober: &Prober,
        monitor_id: &str,
        target: &str,
    ) -> Result<PulseResponse> {
        let outcome = prober.head(target).await;
        self.send(monitor_id, outcome.status, outcome.latency_ms).await
    }
}

impl std::fmt::Debug for PulseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PulseClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
