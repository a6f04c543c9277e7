//! Save slot abstraction.
//!
//! A slot is a single named key-value entry holding one serialized session.
//! Absence of a key is a normal condition and is reported as `Ok(None)`.

use async_trait::async_trait;

use crate::error::DomainError;

/// Key-value store for serialized session state.
#[async_trait]
pub trait SaveStore: Send + Sync {
    /// Reads the raw document stored under `key`, if any.
    async fn read(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Replaces the document stored under `key` with `raw` in one step.
    async fn write(&self, key: &str, raw: &str) -> Result<(), DomainError>;
}
