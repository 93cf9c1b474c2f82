//! Common error types for the campus services

use thiserror::Error;

/// Common result type for campus operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across campus services
///
/// The first three variants are the request-level taxonomy surfaced to
/// callers. The rest are infrastructure failures.
#[derive(Error, Debug)]
pub enum Error {
    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Relational mismatch, duplicate section, or invalid state for mutation
    #[error("{0}")]
    BadRequest(String),

    /// Schedule overlap with an existing assignment
    #[error("{0}")]
    Conflict(String),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// HTTP status code this error is reported with
    pub fn status_code(&self) -> u16 {
        match self {
            Error::NotFound(_) => 404,
            Error::BadRequest(_) => 400,
            Error::Conflict(_) => 409,
            Error::Database(_) | Error::Io(_) | Error::Config(_) | Error::Internal(_) => 500,
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Error::BadRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Error::Conflict(msg.into())
    }
}
