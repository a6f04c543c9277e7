//! Command abstractions.

use uuid::Uuid;

/// Trait that all player-issued commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging spans).
    fn command_type(&self) -> &'static str;

    /// Correlation ID tying the command to the events it produced.
    fn correlation_id(&self) -> Uuid;
}
