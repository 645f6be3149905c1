// src/handlers/mod.rs

pub mod health;
pub mod history;
pub mod pulse;
pub mod status;

pub use health::health_check;
pub use history::history_handler;
pub use pulse::pulse_handler;
pub use status::{status_handler, stored_status};
