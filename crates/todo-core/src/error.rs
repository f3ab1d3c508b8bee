//! Error types for todo-core

use thiserror::Error;

/// Result type alias using todo-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in todo-core operations
///
/// Only a display message is carried; callers surface it as a transient
/// notification and keep running.
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any remote call was made
    #[error("{0}")]
    Validation(String),

    /// Remote store create/update/delete/list failure
    #[error("{0}")]
    Remote(String),

    /// Todo not present in the in-memory list
    #[error("Todo not found: {0}")]
    NotFound(String),

    /// Optional capability unavailable in this environment
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
