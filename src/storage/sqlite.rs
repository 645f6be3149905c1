// src/storage/sqlite.rs

use crate::error::{AppError, Result};
use crate::models::{Heartbeat, HeartbeatSummary, Monitor, MonitorSeed, MonitorStatus};
use crate::storage::MonitorStore;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info};

/// Relational store backed by SQLite.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct MonitorRow {
    id: String,
    name: String,
    #[sqlx(rename = "type")]
    kind: String,
    description: String,
    status: String,
    latency: i64,
    last_seen: Option<i64>,
}

impl TryFrom<MonitorRow> for Monitor {
    type Error = AppError;

    fn try_from(row: MonitorRow) -> Result<Self> {
        Ok(Monitor {
            kind: row.kind.parse().map_err(AppError::Storage)?,
            status: row.status.parse().map_err(AppError::Storage)?,
            latency_ms: u64::try_from(row.latency).unwrap_or(0),
            id: row.id,
            name: row.name,
            description: row.description,
            last_seen: row.last_seen,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct HeartbeatRow {
    monitor_id: String,
    timestamp: i64,
    latency: i64,
    status: String,
}

impl TryFrom<HeartbeatRow> for Heartbeat {
    type Error = AppError;

    fn try_from(row: HeartbeatRow) -> Result<Self> {
        Ok(Heartbeat {
            status: row.status.parse().map_err(AppError::Storage)?,
            latency: u64::try_from(row.latency).unwrap_or(0),
            monitor_id: row.monitor_id,
            timestamp: row.timestamp,
        })
    }
}

impl SqliteStore {
    /// Opens (creating if missing) the database and ensures the schema.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every connection to `:memory:` opens its own database, so an
        // in-memory store must live on exactly one connection.
        let in_memory = database_url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options.connect_with(options).await?;
        let store = Self { pool };
        store.migrate().await?;
        info!(in_memory, "SQLite store ready");
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS monitors (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                type TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL DEFAULT 'down',
                latency INTEGER NOT NULL DEFAULT 0,
                last_seen INTEGER
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS heartbeats (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                monitor_id TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                latency INTEGER NOT NULL,
                status TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_heartbeats_monitor_time
             ON heartbeats(monitor_id, timestamp)",
        )
        .execute(&self.pool)
        .await?;

        debug!("SQLite schema ensured");
        Ok(())
    }
}

fn to_db_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl MonitorStore for SqliteStore {
    async fn seed_monitors(&self, seeds: &[MonitorSeed]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for seed in seeds {
            sqlx::query(
                "INSERT INTO monitors (id, name, type, description) VALUES (?, ?, ?, ?)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    type = excluded.type,
                    description = excluded.description",
            )
            .bind(&seed.id)
            .bind(&seed.name)
            .bind(seed.kind.as_str())
            .bind(&seed.description)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_monitors(&self) -> Result<Vec<Monitor>> {
        let rows = sqlx::query_as::<_, MonitorRow>(
            "SELECT id, name, type, description, status, latency, last_seen
             FROM monitors ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Monitor::try_from).collect()
    }

    async fn record_pulse(&self, heartbeat: &Heartbeat) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE monitors SET status = ?, latency = ?, last_seen = ? WHERE id = ?",
        )
        .bind(heartbeat.status.as_str())
        .bind(to_db_int(heartbeat.latency))
        .bind(heartbeat.timestamp)
        .bind(&heartbeat.monitor_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::UnknownMonitor(heartbeat.monitor_id.clone()));
        }

        sqlx::query(
            "INSERT INTO heartbeats (monitor_id, timestamp, latency, status) VALUES (?, ?, ?, ?)",
        )
        .bind(&heartbeat.monitor_id)
        .bind(heartbeat.timestamp)
        .bind(to_db_int(heartbeat.latency))
        .bind(heartbeat.status.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn recent_heartbeats(
        &self,
        monitor_id: &str,
        since_ms: i64,
        limit: usize,
    ) -> Result<Vec<Heartbeat>> {
        let rows = sqlx::query_as::<_, HeartbeatRow>(
            "SELECT monitor_id, timestamp, latency, status FROM heartbeats
             WHERE monitor_id = ? AND timestamp >= ?
             ORDER BY timestamp DESC, id DESC
             LIMIT ?",
        )
        .bind(monitor_id)
        .bind(since_ms)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Heartbeat::try_from).collect()
    }

    async fn heartbeat_summary(&self, monitor_id: &str, since_ms: i64) -> Result<HeartbeatSummary> {
        let counts = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM heartbeats
             WHERE monitor_id = ? AND timestamp >= ?
             GROUP BY status",
        )
        .bind(monitor_id)
        .bind(since_ms)
        .fetch_all(&self.pool)
        .await?;

        let mut summary = HeartbeatSummary::default();
        for (status, count) in counts {
            let count = u64::try_from(count).unwrap_or(0);
            match status.parse::<MonitorStatus>().map_err(AppError::Storage)? {
                MonitorStatus::Up => summary.up += count,
                MonitorStatus::Down => summary.down += count,
                MonitorStatus::Maintenance => summary.maintenance += count,
            }
        }
        Ok(summary)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
