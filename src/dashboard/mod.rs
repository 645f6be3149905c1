// src/dashboard/mod.rs

//! Terminal status page: polls `GET /api/status` and renders the board.

pub mod render;
pub mod watch;

pub use render::render_board;
pub use watch::watch;

use crate::error::{AppError, Result};
use crate::models::{default_catalog, MonitorStatus, StatusEntry};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

/// Last known state of every system as shown to the viewer.
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    systems: Vec<StatusEntry>,
    last_updated: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the outcome of one fetch attempt made at `at`.
    ///
    /// A successful fetch replaces the systems. A failed fetch keeps whatever
    /// was shown before and only falls back to the static catalog when
    /// nothing was ever shown.
    pub fn apply(&mut self, result: Result<Vec<StatusEntry>>, at: DateTime<Utc>) {
        match result {
            Ok(systems) => {
                self.systems = systems;
                self.last_error = None;
            }
            Err(e) => {
                warn!(error = %e, "Status fetch failed");
                if self.systems.is_empty() {
                    self.systems = fallback_systems();
                }
                self.last_error = Some(e.to_string());
            }
        }
        self.last_updated = Some(at);
    }

    pub fn systems(&self) -> &[StatusEntry] {
        &self.systems
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn all_operational(&self) -> bool {
        self.systems.iter().all(|s| s.status == MonitorStatus::Up)
    }
}

/// The static catalog, every system down with zero uptime and latency.
pub fn fallback_systems() -> Vec<StatusEntry> {
    default_catalog()
        .iter()
        .map(StatusEntry::down_from_seed)
        .collect()
}

/// HTTP client for a status server's public API.
#[derive(Debug, Clone)]
pub struct StatusClient {
    client: Client,
    base_url: String,
}

impl StatusClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AppError::HttpClientBuildError)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch_status(&self) -> Result<Vec<StatusEntry>> {
        let resp = self
            .client
            .get(format!("{}/api/status", self.base_url))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AppError::UpstreamStatus {
                status: resp.status(),
            });
        }
        Ok(resp.json().await?)
    }
}
