// src/storage/traits.rs

use crate::error::Result;
use crate::models::{Heartbeat, HeartbeatSummary, Monitor, MonitorSeed};
use async_trait::async_trait;

/// Persistence for monitors and their heartbeat history.
#[async_trait]
pub trait MonitorStore: Send + Sync {
    /// Inserts missing monitors and refreshes name, type and description of
    /// existing ones. Status, latency and last-seen are never touched.
    async fn seed_monitors(&self, seeds: &[MonitorSeed]) -> Result<()>;

    /// All monitors, ordered by id ascending.
    async fn list_monitors(&self) -> Result<Vec<Monitor>>;

    /// Updates the monitor's current state and appends exactly one history
    /// row. Fails with `AppError::UnknownMonitor` and writes nothing when the
    /// monitor does not exist.
    async fn record_pulse(&self, heartbeat: &Heartbeat) -> Result<()>;

    /// History rows at or after `since_ms`, newest first, at most `limit`.
    async fn recent_heartbeats(
        &self,
        monitor_id: &str,
        since_ms: i64,
        limit: usize,
    ) -> Result<Vec<Heartbeat>>;

    /// Per-status counts of history rows at or after `since_ms`.
    async fn heartbeat_summary(&self, monitor_id: &str, since_ms: i64) -> Result<HeartbeatSummary>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}
