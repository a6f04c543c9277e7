//! Domain events for the session engine.
//!
//! Events describe what a transition did so the host can show notifications
//! ("+20 Courage", "Achievement unlocked"). They are not persisted; the save
//! slot holds a snapshot of state.

use serde::{Deserialize, Serialize};
use storyloom_core::event::{DomainEvent, EventMetadata};

pub const ATTRIBUTE_CHANGED_EVENT_TYPE: &str = "session.attribute_changed";
pub const ACHIEVEMENT_GRANTED_EVENT_TYPE: &str = "session.achievement_granted";
pub const REGION_UNLOCKED_EVENT_TYPE: &str = "session.region_unlocked";
pub const REGION_VISITED_EVENT_TYPE: &str = "session.region_visited";
pub const SCENE_ENTERED_EVENT_TYPE: &str = "session.scene_entered";
pub const SCENE_RESET_EVENT_TYPE: &str = "session.scene_reset";
pub const SESSION_RESTARTED_EVENT_TYPE: &str = "session.restarted";
pub const SESSION_LOADED_EVENT_TYPE: &str = "session.loaded";

/// An attribute moved. `current` is already clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChanged {
    pub key: String,
    pub previous: i32,
    pub current: i32,
    /// Delta the choice asked for, before clamping.
    pub delta: i32,
}

/// A one-shot achievement was granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementGranted {
    pub name: String,
}

/// A region was unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionUnlocked {
    pub region: String,
    /// Display name, when the story defines the region.
    pub name: Option<String>,
}

/// A region was visited for the first time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionVisited {
    pub region: String,
}

/// The player moved between scenes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneEntered {
    pub from: String,
    pub to: String,
}

/// The current scene did not exist and the session fell back to the entry
/// scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneReset {
    pub missing: String,
    pub to: String,
}

/// Event payload variants for the session engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEventKind {
    AttributeChanged(AttributeChanged),
    AchievementGranted(AchievementGranted),
    RegionUnlocked(RegionUnlocked),
    RegionVisited(RegionVisited),
    SceneEntered(SceneEntered),
    SceneReset(SceneReset),
    SessionRestarted,
    SessionLoaded,
}

impl SessionEventKind {
    /// Returns the event type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::AttributeChanged(_) => ATTRIBUTE_CHANGED_EVENT_TYPE,
            Self::AchievementGranted(_) => ACHIEVEMENT_GRANTED_EVENT_TYPE,
            Self::RegionUnlocked(_) => REGION_UNLOCKED_EVENT_TYPE,
            Self::RegionVisited(_) => REGION_VISITED_EVENT_TYPE,
            Self::SceneEntered(_) => SCENE_ENTERED_EVENT_TYPE,
            Self::SceneReset(_) => SCENE_RESET_EVENT_TYPE,
            Self::SessionRestarted => SESSION_RESTARTED_EVENT_TYPE,
            Self::SessionLoaded => SESSION_LOADED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the session engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: SessionEventKind,
}

impl DomainEvent for SessionEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
