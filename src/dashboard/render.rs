// src/dashboard/render.rs

use super::StatusBoard;
use crate::models::{MonitorStatus, StatusEntry};
use std::fmt::Write;

const SLOW_LATENCY_MS: u64 = 50;

fn status_label(status: MonitorStatus) -> &'static str {
    match status {
        MonitorStatus::Up => "Operational",
        MonitorStatus::Down => "Down",
        MonitorStatus::Maintenance => "Maintenance",
    }
}

fn latency_label(entry: &StatusEntry) -> String {
    let marker = if entry.latency < SLOW_LATENCY_MS { ' ' } else { '!' };
    format!("{}ms{marker}", entry.latency)
}

/// Renders the board as a plain-text page: overall banner, update time and
/// one row per system.
pub fn render_board(board: &StatusBoard) -> String {
    let mut out = String::new();

    let banner = if board.all_operational() {
        "[OK] All systems operational"
    } else {
        "[!!] Some systems are experiencing issues"
    };
    let _ = writeln!(out, "{banner}");

    match board.last_updated() {
        Some(at) => {
            let _ = writeln!(out, "Updated: {}", at.format("%H:%M:%S UTC"));
        }
        None => {
            let _ = writeln!(out, "Loading statuses...");
        }
    }
    if let Some(error) = board.last_error() {
        let _ = writeln!(out, "Last fetch failed: {error}");
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "{:<18} {:<12} {:>9} {:>8}  {}",
        "SYSTEM", "STATUS", "LATENCY", "UPTIME", "DESCRIPTION"
    );
    for entry in board.systems() {
        let _ = writeln!(
            out,
            "{:<18} {:<12} {:>9} {:>7}%  {}",
            entry.name,
            status_label(entry.status),
            latency_label(entry),
            entry.uptime,
            entry.description
        );
    }
    out
}
