//! Storyloom — CLI error types.

use storyloom_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the terminal host.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The story could not be loaded or a save slot failed.
    #[error("story error: {0}")]
    Domain(#[from] DomainError),

    /// Terminal I/O error.
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}
