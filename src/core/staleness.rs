// src/core/staleness.rs

use crate::core::uptime::uptime_percent;
use crate::models::{HeartbeatSummary, Monitor, MonitorStatus, StatusEntry};
use std::time::Duration;

/// Dead-man's switch: a monitor that has not reported within `window` is
/// presumed down. A monitor that never reported counts as last seen at 0.
pub fn is_stale(last_seen: Option<i64>, now_ms: i64, window: Duration) -> bool {
    let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
    now_ms.saturating_sub(last_seen.unwrap_or(0)) > window_ms
}

/// Shapes a stored monitor into the public status entry, overriding stale
/// monitors to `down` with zero latency.
pub fn to_status_entry(
    monitor: &Monitor,
    summary: &HeartbeatSummary,
    now_ms: i64,
    window: Duration,
) -> StatusEntry {
    let stale = is_stale(monitor.last_seen, now_ms, window);
    StatusEntry {
        id: monitor.id.clone(),
        name: monitor.name.clone(),
        kind: monitor.kind,
        status: if stale { MonitorStatus::Down } else { monitor.status },
        uptime: uptime_percent(summary),
        latency: if stale { 0 } else { monitor.latency_ms },
        description: monitor.description.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_catalog, Monitor};

    const WINDOW: Duration = Duration::from_secs(90);
    const NOW: i64 = 1_700_000_000_000;

    fn monitor(status: MonitorStatus, latency_ms: u64, last_seen: Option<i64>) -> Monitor {
        Monitor {
            status,
            latency_ms,
            last_seen,
            ..Monitor::from_seed(&default_catalog()[0])
        }
    }

    #[test]
    fn fresh_monitor_keeps_stored_state() {
        let m = monitor(MonitorStatus::Up, 42, Some(NOW - 1_000));
        let entry = to_status_entry(&m, &HeartbeatSummary::default(), NOW, WINDOW);
        assert_eq!(entry.status, MonitorStatus::Up);
        assert_eq!(entry.latency, 42);
    }

    #[test]
    fn boundary_is_not_stale() {
        assert!(!is_stale(Some(NOW - 90_000), NOW, WINDOW));
        assert!(is_stale(Some(NOW - 90_001), NOW, WINDOW));
    }

    #[test]
    fn stale_monitor_is_down_with_zero_latency() {
        let m = monitor(MonitorStatus::Up, 42, Some(NOW - 120_000));
        let entry = to_status_entry(&m, &HeartbeatSummary::default(), NOW, WINDOW);
        assert_eq!(entry.status, MonitorStatus::Down);
        assert_eq!(entry.latency, 0);
    }

    #[test]
    fn stale_maintenance_is_also_down() {
        let m = monitor(MonitorStatus::Maintenance, 7, Some(NOW - 91_000));
        let entry = to_status_entry(&m, &HeartbeatSummary::default(), NOW, WINDOW);
        assert_eq!(entry.status, MonitorStatus::Down);
    }

    #[test]
    fn never_seen_monitor_is_stale() {
        assert!(is_stale(None, NOW, WINDOW));
        let m = monitor(MonitorStatus::Up, 5, None);
        let entry = to_status_entry(&m, &HeartbeatSummary::default(), NOW, WINDOW);
        assert_eq!(entry.status, MonitorStatus::Down);
        assert_eq!(entry.latency, 0);
    }

    #[test]
    fn uptime_comes_from_summary_even_when_stale() {
        let m = monitor(MonitorStatus::Up, 42, Some(NOW - 200_000));
        let summary = HeartbeatSummary {
            up: 3,
            down: 1,
            maintenance: 0,
        };
        let entry = to_status_entry(&m, &summary, NOW, WINDOW);
        assert_eq!(entry.uptime, 75.0);
    }
}
