// src/config/loader.rs

use crate::config::{AppConfig, ConfigValidator};
use crate::error::{AppError, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Load configuration from file (optional), then environment overrides, then
/// validate the result.
pub fn load_config(config_path: &Path) -> Result<AppConfig> {
    let mut config = if config_path.exists() {
        info!("Loading configuration from file: {}", config_path.display());
        load_from_file(config_path)?
    } else {
        info!("Configuration file not found, using defaults");
        AppConfig::default()
    };

    override_with_env(&mut config);

    ConfigValidator::validate(&config)?;

    debug!("Configuration loaded and validated successfully");
    Ok(config)
}

fn load_from_file(config_path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)?;
    if content.trim().is_empty() {
        warn!("Config file '{}' is empty. Using defaults.", config_path.display());
        return Ok(AppConfig::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

fn override_with_env(config: &mut AppConfig) {
    if let Ok(secret) = std::env::var("API_SECRET") {
        info!("Overriding heartbeat secret from environment variable");
        config.pulse.secret = Some(secret);
    }

    if let Ok(port_str) = std::env::var("PORT") {
        if let Ok(port) = port_str.parse::<u16>() {
            info!("Overriding server port from environment variable: {}", port);
            config.server.port = port;
        } else {
            warn!("Invalid PORT environment variable: {}", port_str);
        }
    }

    if let Ok(database_url) = std::env::var("DATABASE_URL") {
        info!("Overriding database URL from environment variable");
        config.storage.database_url = Some(database_url);
    }

    if let Ok(redis_url) = std::env::var("REDIS_URL") {
        info!("Overriding Redis URL from environment variable");
        config.storage.redis_url = Some(redis_url);
    }

    if let Ok(mode) = std::env::var("STATUS_MODE") {
        match mode.parse() {
            Ok(mode) => {
                info!(?mode, "Overriding status mode from environment variable");
                config.status.mode = mode;
            }
            Err(e) => warn!("Invalid STATUS_MODE environment variable: {}", e),
        }
    }
}

/// Load and validate without touching the server, for `check-config`.
pub fn check_config_file(config_path: &Path) -> Result<AppConfig> {
    if !config_path.exists() {
        return Err(AppError::Config(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }
    load_config(config_path)
}
