// src/probe/minecraft.rs

use serde::Deserialize;

/// Response of the third-party Minecraft server status lookup.
///
/// Only `online` is always present; offline servers omit the rest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MinecraftStatus {
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub players: Option<PlayerCount>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct PlayerCount {
    pub online: u32,
    pub max: u32,
}

/// Result of one Minecraft lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MinecraftProbe {
    pub status: MinecraftStatus,
    /// Lookup round trip in milliseconds, 0 when offline.
    pub latency_ms: u64,
}

impl MinecraftProbe {
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn is_online(&self) -> bool {
        self.status.online
    }

    /// "3/100 players", when the lookup reported a player count.
    pub fn players_label(&self) -> Option<String> {
        self.status
            .players
            .map(|p| format!("{}/{} players", p.online, p.max))
    }
}
