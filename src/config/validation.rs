// src/config/validation.rs

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use std::collections::HashSet;
use tracing::{debug, warn};
use url::Url;

/// One year.
const MAX_UPTIME_WINDOW_HOURS: u64 = 24 * 365;

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &AppConfig) -> Result<()> {
        debug!("Starting configuration validation");

        if let Err(e) = Self::validate_server_config(config) {
            warn!("Server config validation failed: {}", e);
            return Err(e);
        }

        if let Err(e) = Self::validate_pulse_config(config) {
            warn!("Pulse config validation failed: {}", e);
            return Err(e);
        }

        if let Err(e) = Self::validate_storage_config(config) {
            warn!("Storage config validation failed: {}", e);
            return Err(e);
        }

        if let Err(e) = Self::validate_probe_config(config) {
            warn!("Probe config validation failed: {}", e);
            return Err(e);
        }

        if let Err(e) = Self::validate_monitors(config) {
            warn!("Monitor list validation failed: {}", e);
            return Err(e);
        }

        debug!("Configuration validation completed successfully");
        Ok(())
    }

    fn validate_server_config(config: &AppConfig) -> Result<()> {
        // Port 0 lets the OS pick a free port, which only makes sense in tests.
        if config.server.port == 0 && !config.server.test_mode {
            return Err(AppError::config_validation(
                "Server port cannot be 0 (except in test mode)",
                Some("server.port"),
            ));
        }

        if config.server.request_timeout_secs == 0 {
            return Err(AppError::config_validation(
                "Request timeout cannot be 0",
                Some("server.request_timeout_secs"),
            ));
        }

        Ok(())
    }

    fn validate_pulse_config(config: &AppConfig) -> Result<()> {
        match config.pulse.secret.as_deref() {
            Some(secret) if secret.trim().is_empty() => {
                return Err(AppError::config_validation(
                    "Heartbeat secret cannot be empty",
                    Some("pulse.secret"),
                ));
            }
            None => warn!("No heartbeat secret configured; every heartbeat will be rejected"),
            Some(_) => {}
        }

        if config.pulse.staleness_window_secs == 0 {
            return Err(AppError::config_validation(
                "Staleness window cannot be 0",
                Some("pulse.staleness_window_secs"),
            ));
        }

        if config.pulse.uptime_window_hours == 0 {
            return Err(AppError::config_validation(
                "Uptime window cannot be 0",
                Some("pulse.uptime_window_hours"),
            ));
        }
        if config.pulse.uptime_window_hours > MAX_UPTIME_WINDOW_HOURS {
            return Err(AppError::config_validation(
                format!("Uptime window cannot exceed {MAX_UPTIME_WINDOW_HOURS} hours"),
                Some("pulse.uptime_window_hours"),
            ));
        }

        Ok(())
    }

    fn validate_storage_config(config: &AppConfig) -> Result<()> {
        if let Some(database_url) = &config.storage.database_url {
            if !database_url.starts_with("sqlite:") {
                return Err(AppError::config_validation(
                    format!("Unsupported database URL '{database_url}', expected sqlite:"),
                    Some("storage.database_url"),
                ));
            }
        }
        if let Some(redis_url) = &config.storage.redis_url {
            Self::validate_url(redis_url, "storage.redis_url")?;
        }
        Ok(())
    }

    fn validate_probe_config(config: &AppConfig) -> Result<()> {
        let probes = &config.probes;
        Self::validate_http_url(&probes.website_url, "probes.website_url")?;
        Self::validate_http_url(&probes.minecraft_status_api, "probes.minecraft_status_api")?;
        if let Some(auth_url) = &probes.auth_url {
            Self::validate_http_url(auth_url, "probes.auth_url")?;
        }

        if probes.minecraft_address.trim().is_empty() {
            return Err(AppError::config_validation(
                "Minecraft address cannot be empty",
                Some("probes.minecraft_address"),
            ));
        }

        if probes.timeout_secs == 0 {
            return Err(AppError::config_validation(
                "Probe timeout cannot be 0",
                Some("probes.timeout_secs"),
            ));
        }

        Ok(())
    }

    fn validate_monitors(config: &AppConfig) -> Result<()> {
        let mut ids = HashSet::new();
        for monitor in &config.monitors {
            if monitor.id.trim().is_empty() {
                return Err(AppError::config_validation(
                    "Monitor id cannot be empty",
                    Some("monitors.id"),
                ));
            }
            if !ids.insert(monitor.id.as_str()) {
                return Err(AppError::config_validation(
                    format!("Duplicate monitor id: {}", monitor.id),
                    Some("monitors.id"),
                ));
            }
        }

        if config.monitors.is_empty() {
            warn!("No monitors configured; the status list will be empty");
        }

        debug!("Validated {} monitors", config.monitors.len());
        Ok(())
    }

    fn validate_url(url_str: &str, field_name: &str) -> Result<Url> {
        Url::parse(url_str).map_err(|e| {
            AppError::config_validation(
                format!("Invalid URL in {field_name}: {url_str} - {e}"),
                Some(field_name),
            )
        })
    }

    fn validate_http_url(url_str: &str, field_name: &str) -> Result<()> {
        let url = Self::validate_url(url_str, field_name)?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AppError::config_validation(
                format!("Unsupported scheme '{scheme}' in {field_name}. Supported: http, https"),
                Some(field_name),
            )),
        }
    }
}
