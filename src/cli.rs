// src/cli.rs

use crate::models::MonitorStatus;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pulse-status",
    version,
    about = "Heartbeat-driven status page for a game server network",
    long_about = "Collects heartbeats from monitored services, serves their current status with a dead-man's switch, and renders the status board in a terminal."
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", env = "PULSE_STATUS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable JSON logging
    #[arg(long, env = "PULSE_STATUS_JSON_LOGS")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Heartbeat status accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Up,
    Down,
    Maintenance,
}

impl From<StatusArg> for MonitorStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Up => MonitorStatus::Up,
            StatusArg::Down => MonitorStatus::Down,
            StatusArg::Maintenance => MonitorStatus::Maintenance,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the status server (default)
    Serve,

    /// Poll a status server and render the board in the terminal
    Watch {
        /// Status server base URL
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,

        /// Seconds between fetches
        #[arg(short, long, default_value_t = 60)]
        interval: u64,

        /// Fetch and render once, then exit
        #[arg(long)]
        once: bool,
    },

    /// Send one heartbeat to a status server
    Pulse {
        /// Status server base URL
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,

        /// Monitor id to report for
        #[arg(short, long)]
        monitor: String,

        /// Reported status; ignored when --target is given
        #[arg(short, long, value_enum, default_value_t = StatusArg::Up)]
        status: StatusArg,

        /// Reported latency in milliseconds; ignored when --target is given
        #[arg(short, long, default_value_t = 0)]
        latency: u64,

        /// Local endpoint to HEAD-probe for status and latency
        #[arg(short, long)]
        target: Option<String>,

        /// Shared heartbeat secret
        #[arg(long, env = "API_SECRET", hide_env_values = true)]
        secret: String,
    },

    /// Validate the configuration file and exit
    CheckConfig {
        /// Configuration file to validate; defaults to --config
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
