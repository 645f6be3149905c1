// src/dashboard/watch.rs

use super::{render_board, StatusBoard, StatusClient};
use crate::error::Result;
use chrono::Utc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

/// Polls `{base_url}/api/status` every `every` and prints the board, until
/// Ctrl+C. With `once`, performs a single fetch and returns.
pub async fn watch(base_url: &str, every: Duration, once: bool) -> Result<()> {
    let client = StatusClient::new(base_url, Duration::from_secs(10))?;
    let mut board = StatusBoard::new();
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(url = base_url, interval_secs = every.as_secs(), "Watching status");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let result = client.fetch_status().await;
                board.apply(result, Utc::now());
                println!("{}", render_board(&board));
                if once {
                    return Ok(());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping watch");
                return Ok(());
            }
        }
    }
}
