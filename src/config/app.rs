// src/config/app.rs

use crate::models::{default_catalog, MonitorSeed};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub test_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            test_mode: false,
        }
    }
}

/// Heartbeat ingestion and freshness settings.
#[derive(Deserialize, Clone, PartialEq)]
pub struct PulseConfig {
    /// Shared secret every heartbeat must carry. Without one, all heartbeats
    /// are rejected.
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default = "default_staleness_window")]
    pub staleness_window_secs: u64,
    #[serde(default = "default_uptime_window")]
    pub uptime_window_hours: u64,
}

impl PulseConfig {
    pub fn staleness_window(&self) -> Duration {
        Duration::from_secs(self.staleness_window_secs)
    }

    pub fn uptime_window(&self) -> Duration {
        Duration::from_secs(self.uptime_window_hours.saturating_mul(3600))
    }
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            secret: None,
            staleness_window_secs: default_staleness_window(),
            uptime_window_hours: default_uptime_window(),
        }
    }
}

impl fmt::Debug for PulseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PulseConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("staleness_window_secs", &self.staleness_window_secs)
            .field("uptime_window_hours", &self.uptime_window_hours)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct StorageConfig {
    /// SQLite connection string, e.g. `sqlite://status.db`.
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub redis_url: Option<String>,
    #[serde(default)]
    pub redis_key_prefix: Option<String>,
}

/// Where `GET /api/status` gets its data from.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusMode {
    /// Read monitors from the store and apply the staleness rule.
    #[default]
    Store,
    /// Probe endpoints on every request.
    Live,
}

impl std::str::FromStr for StatusMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "store" => Ok(Self::Store),
            "live" => Ok(Self::Live),
            other => Err(format!("unknown status mode '{other}'")),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct StatusConfig {
    #[serde(default)]
    pub mode: StatusMode,
}

/// Targets for the live probe variant.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProbeConfig {
    #[serde(default = "default_website_url")]
    pub website_url: String,
    /// Endpoint backing the auth database entry. Falls back to the website
    /// result when unset.
    #[serde(default)]
    pub auth_url: Option<String>,
    #[serde(default = "default_minecraft_address")]
    pub minecraft_address: String,
    #[serde(default = "default_minecraft_status_api")]
    pub minecraft_status_api: String,
    #[serde(default = "default_probe_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            website_url: default_website_url(),
            auth_url: None,
            minecraft_address: default_minecraft_address(),
            minecraft_status_api: default_minecraft_status_api(),
            timeout_secs: default_probe_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pulse: PulseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub status: StatusConfig,
    #[serde(default)]
    pub probes: ProbeConfig,
    #[serde(default = "default_catalog")]
    pub monitors: Vec<MonitorSeed>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            pulse: PulseConfig::default(),
            storage: StorageConfig::default(),
            status: StatusConfig::default(),
            probes: ProbeConfig::default(),
            monitors: default_catalog(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_staleness_window() -> u64 {
    90
}

fn default_uptime_window() -> u64 {
    24
}

fn default_website_url() -> String {
    "https://horni.cc".to_string()
}

fn default_minecraft_address() -> String {
    "mc.horni.cc".to_string()
}

fn default_minecraft_status_api() -> String {
    "https://api.mcsrvstat.us/3".to_string()
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_user_agent() -> String {
    concat!("pulse-status/", env!("CARGO_PKG_VERSION")).to_string()
}
