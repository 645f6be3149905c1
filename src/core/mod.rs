// src/core/mod.rs

pub mod health_check;
pub mod staleness;
pub mod uptime;

pub use health_check::{HealthChecker, HealthReport};
pub use staleness::{is_stale, to_status_entry};
pub use uptime::uptime_percent;
