//! The compiled, immutable story configuration.

use std::collections::{BTreeMap, HashSet};

use storyloom_core::error::DomainError;

use super::attribute::{AttributeBounds, AttributeDefinition};
use super::document::{
    DEFAULT_MAX_VALUE, DEFAULT_MIN_VALUE, PromptTemplates, StoryDocument,
};
use super::scene::{ENTRY_SCENE, Scene};

/// A region the player can unlock and travel to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// A choice whose target scene does not exist in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingTarget {
    /// Scene holding the choice.
    pub scene_id: String,
    /// Missing scene the choice points at.
    pub target: String,
}

/// Validated story configuration. Never mutated after compilation.
#[derive(Debug, Clone)]
pub struct StoryConfig {
    game_id: String,
    title: String,
    subtitle: Option<String>,
    attributes: Vec<AttributeDefinition>,
    scenes: BTreeMap<String, Scene>,
    regions: BTreeMap<String, Region>,
    initial_inventory: Vec<String>,
    initial_achievements: Vec<String>,
    initial_unlocked_regions: Vec<String>,
    initial_visited_regions: Vec<String>,
    track_aggregate_score: bool,
    prompts: PromptTemplates,
}

impl StoryConfig {
    /// Validates an authored document and compiles it.
    ///
    /// Choices pointing at missing scenes are logged, not rejected; the
    /// session engine recovers from them at render time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the game id is empty, an
    /// attribute key is duplicated, an attribute's bounds are inverted or its
    /// initial value lies outside them, or the entry scene is missing.
    pub fn compile(document: StoryDocument) -> Result<Self, DomainError> {
        if document.game_id.trim().is_empty() {
            return Err(DomainError::Validation("gameId must not be empty".into()));
        }

        let mut seen = HashSet::new();
        let mut attributes = Vec::with_capacity(document.attributes.len());
        for attr in document.attributes {
            if !seen.insert(attr.key.clone()) {
                return Err(DomainError::Validation(format!(
                    "duplicate attribute key: {}",
                    attr.key
                )));
            }
            let bounds = AttributeBounds::new(
                attr.min_value.unwrap_or(DEFAULT_MIN_VALUE),
                attr.max_value.unwrap_or(DEFAULT_MAX_VALUE),
            )
            .map_err(|e| DomainError::Validation(format!("attribute {}: {e}", attr.key)))?;
            if !bounds.contains(attr.initial_value) {
                return Err(DomainError::Validation(format!(
                    "attribute {}: initial value {} outside [{}, {}]",
                    attr.key, attr.initial_value, bounds.min, bounds.max
                )));
            }
            attributes.push(AttributeDefinition {
                key: attr.key,
                label: attr.label,
                initial_value: attr.initial_value,
                bounds,
                icon: attr.icon,
                color: attr.color,
                tip: attr.tip,
            });
        }

        if !document.scenes.contains_key(ENTRY_SCENE) {
            return Err(DomainError::Validation(format!(
                "story has no entry scene \"{ENTRY_SCENE}\""
            )));
        }

        let scenes = document
            .scenes
            .into_iter()
            .map(|(id, doc)| {
                let scene = Scene {
                    id: id.clone(),
                    text: doc.text,
                    choices: doc.choices,
                    achievement: doc.achievement,
                    unlocks: doc.unlocks,
                    has_advice: doc.has_advice,
                    has_custom_action: doc.has_custom_action,
                };
                (id, scene)
            })
            .collect();

        let regions = document
            .regions
            .into_iter()
            .map(|(id, doc)| {
                let region = Region {
                    id: id.clone(),
                    name: doc.name,
                };
                (id, region)
            })
            .collect();

        let config = Self {
            game_id: document.game_id,
            title: document.title,
            subtitle: document.subtitle,
            attributes,
            scenes,
            regions,
            initial_inventory: document.initial_inventory,
            initial_achievements: document.initial_achievements,
            initial_unlocked_regions: document.initial_unlocked_regions,
            initial_visited_regions: document.initial_visited_regions,
            track_aggregate_score: document.track_aggregate_score,
            prompts: document.prompts,
        };

        for dangling in config.dangling_targets() {
            tracing::warn!(
                scene_id = %dangling.scene_id,
                target = %dangling.target,
                "choice targets a scene that does not exist"
            );
        }

        Ok(config)
    }

    /// Save slot key for this story.
    #[must_use]
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Optional subtitle.
    #[must_use]
    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    /// Attribute definitions in display order.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeDefinition] {
        &self.attributes
    }

    /// Looks up an attribute definition by key.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|a| a.key == key)
    }

    /// Looks up a scene by identifier.
    #[must_use]
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.get(id)
    }

    /// Returns `true` if the graph contains `id`.
    #[must_use]
    pub fn has_scene(&self, id: &str) -> bool {
        self.scenes.contains_key(id)
    }

    /// The entry scene.
    ///
    /// # Panics
    ///
    /// Never: `compile` rejects stories without an entry scene.
    #[must_use]
    pub fn entry_scene(&self) -> &Scene {
        &self.scenes[ENTRY_SCENE]
    }

    /// All scenes, ordered by identifier.
    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    /// Looks up a region by identifier.
    #[must_use]
    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.get(id)
    }

    #[must_use]
    pub fn initial_inventory(&self) -> &[String] {
        &self.initial_inventory
    }

    #[must_use]
    pub fn initial_achievements(&self) -> &[String] {
        &self.initial_achievements
    }

    #[must_use]
    pub fn initial_unlocked_regions(&self) -> &[String] {
        &self.initial_unlocked_regions
    }

    #[must_use]
    pub fn initial_visited_regions(&self) -> &[String] {
        &self.initial_visited_regions
    }

    /// Whether sessions carry an aggregate score.
    #[must_use]
    pub fn tracks_aggregate_score(&self) -> bool {
        self.track_aggregate_score
    }

    /// Guidance prompt templates.
    #[must_use]
    pub fn prompts(&self) -> &PromptTemplates {
        &self.prompts
    }

    /// Lists choices whose target scene is missing from the graph.
    #[must_use]
    pub fn dangling_targets(&self) -> Vec<DanglingTarget> {
        self.scenes
            .values()
            .flat_map(|scene| {
                scene.choices.iter().filter_map(move |choice| {
                    choice
                        .action
                        .target_scene()
                        .filter(|target| !self.scenes.contains_key(target))
                        .map(|target| DanglingTarget {
                            scene_id: scene.id.clone(),
                            target,
                        })
                })
            })
            .collect()
    }
}
