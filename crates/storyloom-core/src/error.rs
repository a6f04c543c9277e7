//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Corrupt saves, schema drift and unknown scenes are recovered in place and
/// never reach this type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Invalid story configuration or an invalid player request.
    #[error("validation error: {0}")]
    Validation(String),

    /// Player input arrived while input is disabled.
    #[error("input locked: {0}")]
    InputLocked(String),

    /// A save slot could not be read or written.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
