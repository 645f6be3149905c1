// src/storage/mod.rs

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;
pub mod sqlite;
pub mod traits;

pub use memory::InMemoryStore;
#[cfg(feature = "redis")]
pub use redis::RedisStore;
pub use sqlite::SqliteStore;
pub use traits::MonitorStore;

use crate::config::AppConfig;
use crate::error::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Picks the backend from configuration and seeds it with the monitor catalog.
///
/// `database_url` wins over `redis_url`; with neither set the store lives in
/// memory.
pub async fn build_store(config: &AppConfig) -> Result<Arc<dyn MonitorStore>> {
    let store: Arc<dyn MonitorStore> = if let Some(url) = &config.storage.database_url {
        Arc::new(SqliteStore::connect(url).await?)
    } else if let Some(url) = &config.storage.redis_url {
        redis_store(url, config).await?
    } else {
        warn!("No database configured. Monitor state will not survive a restart.");
        Arc::new(InMemoryStore::new())
    };

    store.seed_monitors(&config.monitors).await?;
    info!(
        backend = store.backend_name(),
        monitors = config.monitors.len(),
        "Monitor store initialized"
    );
    Ok(store)
}

#[cfg(feature = "redis")]
async fn redis_store(url: &str, config: &AppConfig) -> Result<Arc<dyn MonitorStore>> {
    let store = RedisStore::connect(url, config.storage.redis_key_prefix.clone()).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "redis"))]
async fn redis_store(_url: &str, _config: &AppConfig) -> Result<Arc<dyn MonitorStore>> {
    Err(crate::error::AppError::Config(
        "redis_url is set but the binary was built without the `redis` feature".to_string(),
    ))
}
