// src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Structured body of an error response.
#[derive(Serialize, Debug)]
struct ErrorResponse {
    error: ErrorDetails,
}

/// Error details carried in the response body.
#[derive(Serialize, Debug)]
struct ErrorDetails {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// Errors that can occur anywhere in the application.
///
/// Implements `IntoResponse`, so handlers can return `Result<T, AppError>`
/// and get a consistent JSON error body.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration validation failed: {message}")]
    ConfigValidation {
        message: String,
        field: Option<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    YamlParsing(#[from] serde_yaml::Error),

    #[error("Reqwest HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("HTTP client build error: {0}")]
    HttpClientBuildError(reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[cfg(feature = "redis")]
    #[error("Redis pool error: {0}")]
    RedisPool(#[from] deadpool_redis::PoolError),

    #[cfg(feature = "redis")]
    #[error("Redis command error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Storage error: {0}")]
    Storage(String),

    /// The heartbeat body could not be read or decoded.
    #[error("Invalid heartbeat payload: {0}")]
    InvalidPulse(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Unknown monitor: {0}")]
    UnknownMonitor(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Upstream status endpoint returned {status}")]
    UpstreamStatus { status: StatusCode },

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[cfg(feature = "redis")]
impl From<deadpool_redis::CreatePoolError> for AppError {
    fn from(e: deadpool_redis::CreatePoolError) -> Self {
        AppError::Storage(format!("Failed to create Redis pool: {e}"))
    }
}

impl AppError {
    pub fn config_validation(message: impl Into<String>, field: Option<&str>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
            field: field.map(str::to_string),
        }
    }

    /// Maps the error to a status code and the details sent to the client.
    ///
    /// Storage and payload failures carry their message in `details`: the
    /// heartbeat endpoint reports the underlying error to the reporter.
    fn to_status_and_details(&self) -> (StatusCode, ErrorDetails) {
        match self {
            // --- 5xx ---
            Self::Config(msg) => {
                error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDetails {
                        error_type: "CONFIG_ERROR".to_string(),
                        message: "Internal server configuration error".to_string(),
                        details: None,
                    },
                )
            }
            Self::ConfigValidation { message, field } => {
                error!(field = ?field, "Configuration validation error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDetails {
                        error_type: "CONFIG_ERROR".to_string(),
                        message: "Internal server configuration error".to_string(),
                        details: None,
                    },
                )
            }
            Self::Io(e) => {
                error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDetails {
                        error_type: "IO_ERROR".to_string(),
                        message: "Internal server error during IO operation".to_string(),
                        details: None,
                    },
                )
            }
            Self::YamlParsing(e) => {
                error!("YAML parsing error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDetails {
                        error_type: "CONFIG_PARSE_ERROR".to_string(),
                        message: "Failed to parse configuration file".to_string(),
                        details: None,
                    },
                )
            }
            Self::HttpClientBuildError(e) => {
                error!("HTTP client build error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDetails {
                        error_type: "HTTP_CLIENT_BUILD_ERROR".to_string(),
                        message: "Internal server error building HTTP client".to_string(),
                        details: None,
                    },
                )
            }
            Self::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDetails {
                        error_type: "STORAGE_ERROR".to_string(),
                        message: e.to_string(),
                        details: Some(self.to_string()),
                    },
                )
            }
            #[cfg(feature = "redis")]
            Self::RedisPool(e) => {
                error!("Redis pool error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDetails {
                        error_type: "STORAGE_ERROR".to_string(),
                        message: e.to_string(),
                        details: Some(self.to_string()),
                    },
                )
            }
            #[cfg(feature = "redis")]
            Self::Redis(e) => {
                error!("Redis command error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDetails {
                        error_type: "STORAGE_ERROR".to_string(),
                        message: e.to_string(),
                        details: Some(self.to_string()),
                    },
                )
            }
            Self::Storage(msg) => {
                error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDetails {
                        error_type: "STORAGE_ERROR".to_string(),
                        message: msg.clone(),
                        details: Some(self.to_string()),
                    },
                )
            }
            Self::InvalidPulse(msg) => {
                warn!("Rejected heartbeat payload: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDetails {
                        error_type: "PULSE_ERROR".to_string(),
                        message: msg.clone(),
                        details: Some(self.to_string()),
                    },
                )
            }
            Self::Reqwest(e) => {
                error!("HTTP client error: {}", e);
                let status = if e.is_timeout() {
                    StatusCode::GATEWAY_TIMEOUT
                } else {
                    StatusCode::BAD_GATEWAY
                };
                (
                    status,
                    ErrorDetails {
                        error_type: "UPSTREAM_ERROR".to_string(),
                        message: "Error communicating with upstream service".to_string(),
                        details: Some(e.to_string()),
                    },
                )
            }
            Self::UpstreamStatus { status } => (
                StatusCode::BAD_GATEWAY,
                ErrorDetails {
                    error_type: "UPSTREAM_STATUS_ERROR".to_string(),
                    message: "Upstream status endpoint returned an error".to_string(),
                    details: Some(status.to_string()),
                },
            ),
            Self::Internal(msg) => {
                error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDetails {
                        error_type: "INTERNAL_SERVER_ERROR".to_string(),
                        message: "An unexpected internal server error occurred".to_string(),
                        details: None,
                    },
                )
            }

            // --- 4xx ---
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetails {
                    error_type: "BAD_REQUEST".to_string(),
                    message: msg.clone(),
                    details: None,
                },
            ),
            Self::PayloadTooLarge { limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorDetails {
                    error_type: "PAYLOAD_TOO_LARGE".to_string(),
                    message: format!("Request body exceeds {limit} bytes"),
                    details: None,
                },
            ),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorDetails {
                    error_type: "UNAUTHORIZED".to_string(),
                    message: "Unauthorized".to_string(),
                    details: None,
                },
            ),
            Self::UnknownMonitor(id) => (
                StatusCode::NOT_FOUND,
                ErrorDetails {
                    error_type: "UNKNOWN_MONITOR".to_string(),
                    message: format!("Monitor not found: {id}"),
                    details: None,
                },
            ),
            Self::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetails {
                    error_type: "NOT_FOUND".to_string(),
                    message: format!("Resource not found: {resource}"),
                    details: None,
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_details) = self.to_status_and_details();
        let body = Json(ErrorResponse {
            error: error_details,
        });
        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
