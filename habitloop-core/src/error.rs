//! Error types for habitloop-core

use thiserror::Error;

/// Main error type for the habitloop-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// API/backend error
    #[error("API error: {0}")]
    Api(String),

    /// The backend rejected the request token (signed out or expired)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Session error (missing or unusable stored session)
    #[error("session error: {0}")]
    Session(String),
}

/// Result type alias for habitloop-core
pub type Result<T> = std::result::Result<T, Error>;
