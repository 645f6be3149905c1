// src/probe/mod.rs

//! Outbound reachability checks backing the live status variant.
//!
//! Probe failures never surface as errors: anything that goes wrong maps to
//! `down` with zero latency.

pub mod minecraft;

pub use minecraft::{MinecraftProbe, MinecraftStatus, PlayerCount};

use crate::config::ProbeConfig;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{default_catalog, MonitorStatus, StatusEntry};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Outcome of a single HEAD probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub status: MonitorStatus,
    pub latency_ms: u64,
}

impl ProbeOutcome {
    pub fn up(latency_ms: u64) -> Self {
        Self {
            status: MonitorStatus::Up,
            latency_ms,
        }
    }

    pub fn down() -> Self {
        Self {
            status: MonitorStatus::Down,
            latency_ms: 0,
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == MonitorStatus::Up
    }
}

#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    config: ProbeConfig,
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl Prober {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(AppError::HttpClientBuildError)?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// HEAD `url`. 2xx and 3xx count as up.
    pub async fn head(&self, url: &str) -> ProbeOutcome {
        let start = Instant::now();
        let outcome = match self.client.head(url).send().await {
            Ok(resp) if resp.status().is_success() || resp.status().is_redirection() => {
                ProbeOutcome::up(elapsed_ms(start))
            }
            Ok(resp) => {
                debug!(url, status = %resp.status(), "HEAD probe got error status");
                ProbeOutcome::down()
            }
            Err(e) => {
                warn!(url, error = %e, "HEAD probe failed");
                ProbeOutcome::down()
            }
        };
        metrics::record_probe("http", outcome.is_up(), start.elapsed());
        outcome
    }

    /// Looks `address` up through the configured Minecraft status API.
    pub async fn minecraft(&self, address: &str) -> MinecraftProbe {
        let start = Instant::now();
        let url = format!(
            "{}/{}",
            self.config.minecraft_status_api.trim_end_matches('/'),
            address
        );

        let probe = match self.fetch_minecraft(&url).await {
            Ok(status) if status.online => MinecraftProbe {
                status,
                latency_ms: elapsed_ms(start),
            },
            Ok(status) => MinecraftProbe {
                status,
                latency_ms: 0,
            },
            Err(e) => {
                warn!(address, error = %e, "Minecraft status lookup failed");
                MinecraftProbe::offline()
            }
        };
        metrics::record_probe("minecraft", probe.is_online(), start.elapsed());
        probe
    }

    async fn fetch_minecraft(&self, url: &str) -> Result<MinecraftStatus> {
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(AppError::UpstreamStatus {
                status: resp.status(),
            });
        }
        Ok(resp.json::<MinecraftStatus>().await?)
    }

    /// Probes every system once, in sequence, and returns the five catalog
    /// entries in catalog order.
    pub async fn probe_systems(&self) -> Vec<StatusEntry> {
        let game = self.minecraft(&self.config.minecraft_address).await;
        let web = self.head(&self.config.website_url).await;
        let auth = match &self.config.auth_url {
            Some(url) => self.head(url).await,
            None => web,
        };

        let game_outcome = if game.is_online() {
            ProbeOutcome::up(game.latency_ms)
        } else {
            ProbeOutcome::down()
        };

        default_catalog()
            .iter()
            .map(|seed| {
                let outcome = match seed.id.as_str() {
                    "web" => web,
                    "auth" => auth,
                    _ => game_outcome,
                };
                let mut entry = StatusEntry::down_from_seed(seed);
                entry.status = outcome.status;
                entry.latency = outcome.latency_ms;
                entry.uptime = if outcome.is_up() { 100.0 } else { 0.0 };
                if seed.id == "main" {
                    if let Some(players) = game.players_label() {
                        entry.description = format!("{} ({players})", entry.description);
                    }
                }
                entry
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> ProbeConfig {
        ProbeConfig {
            website_url: "http://127.0.0.1:1".to_string(),
            auth_url: None,
            minecraft_status_api: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
            ..ProbeConfig::default()
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_down_with_zero_latency() {
        let prober = Prober::new(&unreachable_config()).unwrap();
        assert_eq!(prober.head("http://127.0.0.1:1/").await, ProbeOutcome::down());
    }

    #[tokio::test]
    async fn unreachable_lookup_is_offline() {
        let prober = Prober::new(&unreachable_config()).unwrap();
        let probe = prober.minecraft("mc.example.net").await;
        assert!(!probe.is_online());
        assert_eq!(probe.latency_ms, 0);
    }

    #[tokio::test]
    async fn all_systems_down_when_nothing_answers() {
        let prober = Prober::new(&unreachable_config()).unwrap();
        let entries = prober.probe_systems().await;
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["main", "hub", "proxy", "web", "auth"]);
        assert!(entries
            .iter()
            .all(|e| e.status == MonitorStatus::Down && e.latency == 0 && e.uptime == 0.0));
    }
}
