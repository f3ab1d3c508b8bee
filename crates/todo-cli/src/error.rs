use std::io;

use thiserror::Error;
use todo_core::auth::AuthError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] todo_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No todo text provided")]
    EmptyText,
    #[error("Todo ID cannot be empty")]
    EmptyTodoId,
    #[error("Invalid reminder time '{0}'; use RFC 3339 or \"YYYY-MM-DD HH:MM\"")]
    InvalidReminder(String),
    #[error("Authentication error: {0}")]
    Auth(String),
}

impl From<AuthError> for CliError {
    fn from(error: AuthError) -> Self {
        Self::Auth(error.to_string())
    }
}
