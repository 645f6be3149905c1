// src/storage/memory.rs

use crate::error::{AppError, Result};
use crate::models::{Heartbeat, HeartbeatSummary, Monitor, MonitorSeed};
use crate::storage::MonitorStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::trace;

#[derive(Default)]
struct Tables {
    // BTreeMap keeps `list_monitors` ordered by id.
    monitors: BTreeMap<String, Monitor>,
    heartbeats: Vec<Heartbeat>,
}

/// In-memory store. State is lost on restart.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MonitorStore for InMemoryStore {
    async fn seed_monitors(&self, seeds: &[MonitorSeed]) -> Result<()> {
        let mut tables = self.tables.write().await;
        for seed in seeds {
            match tables.monitors.get_mut(&seed.id) {
                Some(existing) => {
                    existing.name = seed.name.clone();
                    existing.kind = seed.kind;
                    existing.description = seed.description.clone();
                }
                None => {
                    tables
                        .monitors
                        .insert(seed.id.clone(), Monitor::from_seed(seed));
                }
            }
        }
        Ok(())
    }

    async fn list_monitors(&self) -> Result<Vec<Monitor>> {
        trace!("InMemoryStore::list_monitors: waiting for read lock");
        let tables = self.tables.read().await;
        Ok(tables.monitors.values().cloned().collect())
    }

    async fn record_pulse(&self, heartbeat: &Heartbeat) -> Result<()> {
        trace!("InMemoryStore::record_pulse: waiting for write lock");
        let mut tables = self.tables.write().await;

        let monitor = tables
            .monitors
            .get_mut(&heartbeat.monitor_id)
            .ok_or_else(|| AppError::UnknownMonitor(heartbeat.monitor_id.clone()))?;
        monitor.status = heartbeat.status;
        monitor.latency_ms = heartbeat.latency;
        monitor.last_seen = Some(heartbeat.timestamp);

        tables.heartbeats.push(heartbeat.clone());
        Ok(())
    }

    async fn recent_heartbeats(
        &self,
        monitor_id: &str,
        since_ms: i64,
        limit: usize,
    ) -> Result<Vec<Heartbeat>> {
        let tables = self.tables.read().await;
        let mut recent: Vec<Heartbeat> = tables
            .heartbeats
            .iter()
            .rev()
            .filter(|hb| hb.monitor_id == monitor_id && hb.timestamp >= since_ms)
            .cloned()
            .collect();
        // Stable sort: equal timestamps stay newest-inserted first.
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(limit);
        Ok(recent)
    }

    async fn heartbeat_summary(&self, monitor_id: &str, since_ms: i64) -> Result<HeartbeatSummary> {
        let tables = self.tables.read().await;
        let mut summary = HeartbeatSummary::default();
        tables
            .heartbeats
            .iter()
            .filter(|hb| hb.monitor_id == monitor_id && hb.timestamp >= since_ms)
            .for_each(|hb| summary.add(hb.status));
        Ok(summary)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
