//! Serialized story document shape.
//!
//! Field names are camelCase; aliases accept the older document variants
//! (`scenarios`, `stats`, `states`, `hasGeminiAdvice`, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::scene::Choice;

/// Lower bound used when an attribute omits `minValue`.
pub const DEFAULT_MIN_VALUE: i32 = 0;

/// Upper bound used when an attribute omits `maxValue`.
pub const DEFAULT_MAX_VALUE: i32 = 100;

/// Top-level story document as authored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryDocument {
    /// Save slot key for this story.
    pub game_id: String,
    /// Display title.
    #[serde(alias = "gameTitle")]
    pub title: String,
    /// Optional subtitle.
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Attribute definitions.
    #[serde(default)]
    pub attributes: Vec<AttributeDocument>,
    /// Scene graph keyed by scene identifier.
    #[serde(alias = "scenarios")]
    pub scenes: BTreeMap<String, SceneDocument>,
    /// Travel regions keyed by identifier.
    #[serde(default, alias = "states")]
    pub regions: BTreeMap<String, RegionDocument>,
    /// Items in a fresh inventory.
    #[serde(default)]
    pub initial_inventory: Vec<String>,
    /// Achievements a fresh session already holds.
    #[serde(default)]
    pub initial_achievements: Vec<String>,
    /// Regions open in a fresh session.
    #[serde(default, alias = "initialUnlockedStates")]
    pub initial_unlocked_regions: Vec<String>,
    /// Regions already visited in a fresh session.
    #[serde(default)]
    pub initial_visited_regions: Vec<String>,
    /// Whether sessions carry an aggregate score.
    #[serde(default)]
    pub track_aggregate_score: bool,
    /// Guidance prompt templates.
    #[serde(default)]
    pub prompts: PromptTemplates,
}

/// Attribute definition as authored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDocument {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub initial_value: i32,
    #[serde(default)]
    pub min_value: Option<i32>,
    #[serde(default)]
    pub max_value: Option<i32>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub tip: Option<String>,
}

/// Scene as authored; the identifier is the map key.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    pub text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub achievement: Option<String>,
    #[serde(default)]
    pub unlocks: Option<String>,
    #[serde(default, alias = "hasGeminiAdvice")]
    pub has_advice: bool,
    #[serde(default, alias = "canTriggerCustomAction", alias = "canDraftDecree")]
    pub has_custom_action: bool,
}

/// Region as authored.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionDocument {
    pub name: String,
}

/// Prompt templates for guidance requests, in `minijinja` syntax.
///
/// Variables: `{{ title }}`, `{{ attribute_labels }}`, `{{ attributes }}` and
/// `{{ scene }}`. The fallback template takes `{{ error }}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PromptTemplates {
    pub mentor: String,
    pub hint: String,
    pub custom_action: String,
    pub fallback: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            mentor: "You are an expert mentor for an educational RPG titled \"{{ title }}\". \
                     A new player needs guidance. Provide 3 key pieces of advice based on \
                     the game's core attributes: {{ attribute_labels }}. Structure the advice \
                     as a numbered list."
                .to_owned(),
            hint: "You are a wise AI advisor in the RPG \"{{ title }}\". The player needs a hint. \
                   Current Situation: \"{{ scene }}\". Player's Stats: {{ attributes }}. Provide a \
                   short, cryptic hint (2-3 sentences) to guide their thinking. Do NOT tell \
                   them which option to pick."
                .to_owned(),
            custom_action: "You are a creative AI assistant in the RPG \"{{ title }}\". The player \
                            triggered a special action. The event: \"{{ scene }}\". Generate a \
                            short, thematic, creative output based on this. For example, if \
                            they discovered a species, suggest a scientific name."
                .to_owned(),
            fallback: "Sorry, there was an error contacting the AI advisor. {{ error }}".to_owned(),
        }
    }
}
