//! Error types for the Events API Lambda functions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Events API Lambda functions.
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error (missing/empty required fields, bad values)
    #[error("Validation error: {0}")]
    Validation(String),

    /// HTTP method not allowed for this endpoint
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::MethodNotAllowed(_) => 405,
            _ => 500,
        }
    }

    /// Stable machine-readable code for the failure envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            Error::Database(_) => "STORE_ERROR",
            Error::Aws(_) => "AWS_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to return to clients. Server-side errors get a generic
    /// message; the real cause is logged, never serialized into a response.
    pub fn public_message(&self) -> String {
        match self {
            Error::Validation(msg) => msg.clone(),
            Error::MethodNotAllowed(msg) => msg.clone(),
            _ => "Something went wrong".to_string(),
        }
    }

    /// Details string for the failure envelope, with the same non-leaking
    /// policy as [`public_message`](Self::public_message).
    pub fn public_details(&self) -> String {
        match self {
            Error::Validation(msg) => msg.clone(),
            Error::MethodNotAllowed(msg) => msg.clone(),
            _ => "An unexpected error occurred".to_string(),
        }
    }
}
