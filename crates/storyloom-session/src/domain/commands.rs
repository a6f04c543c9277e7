//! Commands for the session engine.

use storyloom_advisor::GuidanceKind;
use storyloom_core::command::Command;
use uuid::Uuid;

/// Command to restore the session from the story's save slot.
#[derive(Debug, Clone)]
pub struct LoadGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for LoadGame {
    fn command_type(&self) -> &'static str {
        "session.load_game"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to write the session to the story's save slot.
#[derive(Debug, Clone)]
pub struct SaveGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for SaveGame {
    fn command_type(&self) -> &'static str {
        "session.save_game"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to apply one of the current scene's choices.
#[derive(Debug, Clone)]
pub struct ApplyChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Zero-based index into the current scene's choices.
    pub choice_index: usize,
}

impl Command for ApplyChoice {
    fn command_type(&self) -> &'static str {
        "session.apply_choice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to discard progress and start over.
#[derive(Debug, Clone)]
pub struct RestartGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for RestartGame {
    fn command_type(&self) -> &'static str {
        "session.restart_game"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to ask the advisor for guidance.
#[derive(Debug, Clone)]
pub struct RequestGuidance {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Which guidance to request.
    pub kind: GuidanceKind,
}

impl Command for RequestGuidance {
    fn command_type(&self) -> &'static str {
        "session.request_guidance"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
