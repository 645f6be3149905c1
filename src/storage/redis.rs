// src/storage/redis.rs

use crate::error::{AppError, Result};
use crate::models::{Heartbeat, HeartbeatSummary, Monitor, MonitorSeed, MonitorStatus};
use crate::storage::MonitorStore;
use async_trait::async_trait;
use deadpool_redis::{Config as PoolConfig, Connection as RedisConnection, Pool, Runtime};
use redis::AsyncCommands;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, trace, warn};
use uuid::Uuid;

const MONITOR_SET_KEY: &str = "monitors";
const DEFAULT_KEY_PREFIX: &str = "pulse_status:";

/// Redis implementation of the monitor store.
///
/// Layout under the key prefix:
/// - `monitors`: set of monitor ids
/// - `monitor:{id}`: hash with metadata and current state
/// - `heartbeats:{id}`: sorted set of JSON heartbeats scored by timestamp
pub struct RedisStore {
    pool: Pool,
    key_prefix: String,
}

impl RedisStore {
    pub fn new(pool: Pool, key_prefix: Option<String>) -> Self {
        let key_prefix = key_prefix.unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string());
        Self { pool, key_prefix }
    }

    /// Builds a pool for `redis_url` and checks that the server answers.
    pub async fn connect(redis_url: &str, key_prefix: Option<String>) -> Result<Self> {
        let pool = PoolConfig::from_url(redis_url).create_pool(Some(Runtime::Tokio1))?;
        let store = Self::new(pool, key_prefix);
        let mut conn = store.get_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        info!(prefix = %store.key_prefix, "Redis store ready");
        Ok(store)
    }

    fn prefix_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    fn monitor_key(&self, id: &str) -> String {
        self.prefix_key(&format!("monitor:{id}"))
    }

    fn heartbeats_key(&self, id: &str) -> String {
        self.prefix_key(&format!("heartbeats:{id}"))
    }

    async fn get_connection(&self) -> Result<RedisConnection> {
        self.pool.get().await.map_err(Into::into)
    }

    fn parse_monitor(id: &str, fields: HashMap<String, String>) -> Result<Monitor> {
        let field = |name: &str| fields.get(name).cloned().unwrap_or_default();
        Ok(Monitor {
            id: id.to_string(),
            name: field("name"),
            kind: field("type").parse().map_err(AppError::Storage)?,
            description: field("description"),
            status: fields
                .get("status")
                .map(|s| s.parse())
                .transpose()
                .map_err(AppError::Storage)?
                .unwrap_or(MonitorStatus::Down),
            latency_ms: fields
                .get("latency")
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            last_seen: fields.get("last_seen").and_then(|s| s.parse().ok()),
        })
    }

    /// Sorted-set member for one heartbeat. The entry id keeps two identical
    /// heartbeats in the same millisecond from collapsing into one member.
    fn encode_heartbeat(heartbeat: &Heartbeat) -> Result<String> {
        serde_json::to_string(&HistoryEntry {
            entry_id: Uuid::new_v4(),
            heartbeat,
        })
        .map_err(|e| AppError::Storage(format!("Failed to encode heartbeat: {e}")))
    }

    /// Decodes members in the order given. Entries that fail to decode are
    /// skipped with a warning.
    fn decode_heartbeats(monitor_id: &str, raw: &[String]) -> Vec<Heartbeat> {
        raw.iter()
            .filter_map(|entry| match serde_json::from_str::<Heartbeat>(entry) {
                Ok(hb) => Some(hb),
                Err(e) => {
                    warn!(monitor_id, error = %e, "Skipping undecodable heartbeat entry");
                    None
                }
            })
            .collect()
    }
}

#[derive(Serialize)]
struct HistoryEntry<'a> {
    entry_id: Uuid,
    #[serde(flatten)]
    heartbeat: &'a Heartbeat,
}

#[async_trait]
impl MonitorStore for RedisStore {
    async fn seed_monitors(&self, seeds: &[MonitorSeed]) -> Result<()> {
        let mut conn = self.get_connection().await?;
        let mut pipe = redis::pipe();
        pipe.atomic();
        for seed in seeds {
            let key = self.monitor_key(&seed.id);
            pipe.sadd(self.prefix_key(MONITOR_SET_KEY), &seed.id);
            pipe.hset_multiple(
                &key,
                &[
                    ("name", seed.name.as_str()),
                    ("type", seed.kind.as_str()),
                    ("description", seed.description.as_str()),
                ],
            );
            pipe.hset_nx(&key, "status", MonitorStatus::Down.as_str());
            pipe.hset_nx(&key, "latency", 0);
        }
        let _: () = pipe.query_async(&mut conn).await?;
        info!("Seeded {} monitors into Redis", seeds.len());
        Ok(())
    }

    async fn list_monitors(&self) -> Result<Vec<Monitor>> {
        trace!("RedisStore::list_monitors: start");
        let mut conn = self.get_connection().await?;
        let mut ids: Vec<String> = conn.smembers(self.prefix_key(MONITOR_SET_KEY)).await?;
        ids.sort();

        let mut monitors = Vec::with_capacity(ids.len());
        for id in &ids {
            let fields: HashMap<String, String> = conn.hgetall(self.monitor_key(id)).await?;
            if fields.is_empty() {
                warn!(monitor_id = %id, "Monitor listed in set but has no hash");
                continue;
            }
            monitors.push(Self::parse_monitor(id, fields)?);
        }
        trace!("RedisStore::list_monitors: found {} monitors", monitors.len());
        Ok(monitors)
    }

    async fn record_pulse(&self, heartbeat: &Heartbeat) -> Result<()> {
        let mut conn = self.get_connection().await?;
        let known: bool = conn
            .sismember(self.prefix_key(MONITOR_SET_KEY), &heartbeat.monitor_id)
            .await?;
        if !known {
            return Err(AppError::UnknownMonitor(heartbeat.monitor_id.clone()));
        }

        let entry = Self::encode_heartbeat(heartbeat)?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        pipe.hset_multiple(
            self.monitor_key(&heartbeat.monitor_id),
            &[
                ("status", heartbeat.status.as_str().to_string()),
                ("latency", heartbeat.latency.to_string()),
                ("last_seen", heartbeat.timestamp.to_string()),
            ],
        );
        pipe.zadd(
            self.heartbeats_key(&heartbeat.monitor_id),
            entry,
            heartbeat.timestamp,
        );
        let _: () = pipe.query_async(&mut conn).await?;
        Ok(())
    }

    async fn recent_heartbeats(
        &self,
        monitor_id: &str,
        since_ms: i64,
        limit: usize,
    ) -> Result<Vec<Heartbeat>> {
        let mut conn = self.get_connection().await?;
        let count = isize::try_from(limit).unwrap_or(isize::MAX);
        let raw: Vec<String> = conn
            .zrevrangebyscore_limit(self.heartbeats_key(monitor_id), "+inf", since_ms, 0, count)
            .await?;
        Ok(Self::decode_heartbeats(monitor_id, &raw))
    }

    async fn heartbeat_summary(&self, monitor_id: &str, since_ms: i64) -> Result<HeartbeatSummary> {
        let mut conn = self.get_connection().await?;
        let raw: Vec<String> = conn
            .zrangebyscore(self.heartbeats_key(monitor_id), since_ms, "+inf")
            .await?;
        let mut summary = HeartbeatSummary::default();
        Self::decode_heartbeats(monitor_id, &raw)
            .iter()
            .for_each(|hb| summary.add(hb.status));
        Ok(summary)
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonitorKind;

    #[test]
    fn keys_use_prefix() {
        let pool = PoolConfig::from_url("redis://127.0.0.1:6379")
            .create_pool(Some(Runtime::Tokio1))
            .unwrap();
        let store = RedisStore::new(pool, None);
        assert_eq!(store.monitor_key("main"), "pulse_status:monitor:main");
        assert_eq!(store.heartbeats_key("hub"), "pulse_status:heartbeats:hub");
        assert_eq!(store.prefix_key(MONITOR_SET_KEY), "pulse_status:monitors");
    }

    #[test]
    fn parses_monitor_hash() {
        let fields: HashMap<String, String> = [
            ("name", "Velocity Proxy"),
            ("type", "proxy"),
            ("description", "routing"),
            ("status", "up"),
            ("latency", "17"),
            ("last_seen", "1700000000000"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let monitor = RedisStore::parse_monitor("proxy", fields).unwrap();
        assert_eq!(monitor.kind, MonitorKind::Proxy);
        assert_eq!(monitor.status, MonitorStatus::Up);
        assert_eq!(monitor.latency_ms, 17);
        assert_eq!(monitor.last_seen, Some(1_700_000_000_000));
    }

    #[test]
    fn never_seen_monitor_parses_as_down() {
        let fields: HashMap<String, String> = [("name", "Hub"), ("type", "game")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let monitor = RedisStore::parse_monitor("hub", fields).unwrap();
        assert_eq!(monitor.status, MonitorStatus::Down);
        assert_eq!(monitor.last_seen, None);
    }

    #[test]
    fn identical_heartbeats_encode_to_distinct_members() {
        let heartbeat = Heartbeat {
            monitor_id: "main".to_string(),
            timestamp: 1_700_000_000_000,
            latency: 12,
            status: MonitorStatus::Up,
        };
        let first = RedisStore::encode_heartbeat(&heartbeat).unwrap();
        let second = RedisStore::encode_heartbeat(&heartbeat).unwrap();
        assert_ne!(first, second);

        let decoded = RedisStore::decode_heartbeats("main", &[first, "{broken".to_string(), second]);
        assert_eq!(decoded, vec![heartbeat.clone(), heartbeat]);
    }

    #[test]
    fn rejects_unknown_type() {
        let fields: HashMap<String, String> = [("name", "X"), ("type", "satellite")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(matches!(
            RedisStore::parse_monitor("x", fields),
            Err(AppError::Storage(_))
        ));
    }
}
