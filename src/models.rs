// src/models.rs

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reported health of a monitored system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorStatus {
    Up,
    Down,
    Maintenance,
}

impl MonitorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonitorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(format!("unknown monitor status '{other}'")),
        }
    }
}

/// Category of a monitored system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorKind {
    Game,
    Web,
    Db,
    Proxy,
}

impl MonitorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Game => "game",
            Self::Web => "web",
            Self::Db => "db",
            Self::Proxy => "proxy",
        }
    }
}

impl fmt::Display for MonitorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonitorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "game" => Ok(Self::Game),
            "web" => Ok(Self::Web),
            "db" => Ok(Self::Db),
            "proxy" => Ok(Self::Proxy),
            other => Err(format!("unknown monitor type '{other}'")),
        }
    }
}

/// Static description of a monitor, used to seed the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSeed {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MonitorKind,
    #[serde(default)]
    pub description: String,
}

impl MonitorSeed {
    pub fn new(id: &str, name: &str, kind: MonitorKind, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            description: description.to_string(),
        }
    }
}

/// A monitor row: identity plus last-known state.
#[derive(Debug, Clone, PartialEq)]
pub struct Monitor {
    pub id: String,
    pub name: String,
    pub kind: MonitorKind,
    pub description: String,
    pub status: MonitorStatus,
    pub latency_ms: u64,
    /// Epoch milliseconds of the last accepted heartbeat.
    pub last_seen: Option<i64>,
}

impl Monitor {
    /// A monitor that has never reported.
    pub fn from_seed(seed: &MonitorSeed) -> Self {
        Self {
            id: seed.id.clone(),
            name: seed.name.clone(),
            kind: seed.kind,
            description: seed.description.clone(),
            status: MonitorStatus::Down,
            latency_ms: 0,
            last_seen: None,
        }
    }
}

/// One entry of the append-only heartbeat history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heartbeat {
    pub monitor_id: String,
    pub timestamp: i64,
    pub latency: u64,
    pub status: MonitorStatus,
}

/// Per-status heartbeat counts inside a time window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeartbeatSummary {
    pub up: u64,
    pub down: u64,
    pub maintenance: u64,
}

impl HeartbeatSummary {
    pub fn add(&mut self, status: MonitorStatus) {
        match status {
            MonitorStatus::Up => self.up += 1,
            MonitorStatus::Down => self.down += 1,
            MonitorStatus::Maintenance => self.maintenance += 1,
        }
    }
}

/// One system as returned by `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MonitorKind,
    pub status: MonitorStatus,
    pub uptime: f64,
    pub latency: u64,
    pub description: String,
}

impl StatusEntry {
    /// An entry for a system that is presumed down.
    pub fn down_from_seed(seed: &MonitorSeed) -> Self {
        Self {
            id: seed.id.clone(),
            name: seed.name.clone(),
            kind: seed.kind,
            status: MonitorStatus::Down,
            uptime: 0.0,
            latency: 0,
            description: seed.description.clone(),
        }
    }
}

/// Body of `POST /api/pulse`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseRequest {
    pub monitor_id: String,
    /// Milliseconds. Fractional values are rounded.
    #[serde(deserialize_with = "deserialize_latency")]
    pub latency: u64,
    pub status: MonitorStatus,
    pub secret: String,
}

fn deserialize_latency<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 {
        return Err(D::Error::custom(format!(
            "latency must be a non-negative number, got {value}"
        )));
    }
    Ok(value.round() as u64)
}

/// Successful response of `POST /api/pulse`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseResponse {
    pub success: bool,
    pub timestamp: i64,
}

/// The five systems of the network, in display order.
///
/// Seeds the store by default, backs the live probe variant and is the
/// dashboard's fallback list.
pub fn default_catalog() -> Vec<MonitorSeed> {
    vec![
        MonitorSeed::new("main", "Main Survival", MonitorKind::Game, "Main game world"),
        MonitorSeed::new(
            "hub",
            "Lobby Hub",
            MonitorKind::Game,
            "Entry point and authentication",
        ),
        MonitorSeed::new(
            "proxy",
            "Velocity Proxy",
            MonitorKind::Proxy,
            "DDoS protection and routing",
        ),
        MonitorSeed::new("web", "Website & API", MonitorKind::Web, "Website and backend API"),
        MonitorSeed::new("auth", "Auth Database", MonitorKind::Db, "Player database"),
    ]
}
