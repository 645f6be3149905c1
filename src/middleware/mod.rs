// src/middleware/mod.rs

pub mod request_size_limit;

pub use request_size_limit::{request_size_limit_middleware, MAX_REQUEST_SIZE};
