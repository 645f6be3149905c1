// src/core/uptime.rs

use crate::models::HeartbeatSummary;

/// Share of `up` heartbeats among up and down heartbeats, as a percentage
/// rounded to two decimals. Maintenance heartbeats are not counted.
/// Returns 0.0 when there is nothing to count.
pub fn uptime_percent(summary: &HeartbeatSummary) -> f64 {
    let counted = summary.up + summary.down;
    if counted == 0 {
        return 0.0;
    }
    let percent = summary.up as f64 * 100.0 / counted as f64;
    (percent * 100.0).round() / 100.0
}
