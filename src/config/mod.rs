// src/config/mod.rs

pub mod app;
pub mod loader;
pub mod validation;

pub use app::{AppConfig, ProbeConfig, PulseConfig, ServerConfig, StatusConfig, StatusMode, StorageConfig};
pub use loader::{check_config_file, load_config};
pub use validation::ConfigValidator;
