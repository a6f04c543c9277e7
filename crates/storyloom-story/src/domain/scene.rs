//! Scenes and the choices leading out of them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::action::Action;

/// Identifier of the scene every session starts in and falls back to.
pub const ENTRY_SCENE: &str = "intro";

/// An edge out of a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// Display text.
    pub text: String,
    /// Effect of selecting the choice.
    pub action: Action,
    /// Signed deltas keyed by attribute key.
    #[serde(default, alias = "stats")]
    pub attribute_changes: BTreeMap<String, i32>,
}

impl Choice {
    /// Creates a choice with no attribute changes.
    #[must_use]
    pub fn new(text: impl Into<String>, action: Action) -> Self {
        Self {
            text: text.into(),
            action,
            attribute_changes: BTreeMap::new(),
        }
    }

    /// Adds an attribute delta.
    #[must_use]
    pub fn with_change(mut self, key: impl Into<String>, delta: i32) -> Self {
        self.attribute_changes.insert(key.into(), delta);
        self
    }
}

/// A node in the story graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scene {
    /// Unique identifier.
    pub id: String,
    /// Narrative text.
    pub text: String,
    /// Outgoing choices, in display order. Empty means a dead end.
    pub choices: Vec<Choice>,
    /// Achievement granted the first time the player leaves this scene.
    pub achievement: Option<String>,
    /// Region unlocked when the player leaves this scene.
    pub unlocks: Option<String>,
    /// Whether the player may ask for a hint here.
    pub has_advice: bool,
    /// Whether the scene offers a creative special action.
    pub has_custom_action: bool,
}
