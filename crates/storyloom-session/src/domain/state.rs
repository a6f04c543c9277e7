//! Session state: the complete mutable snapshot of one player's progress.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use storyloom_story::domain::scene::ENTRY_SCENE;
use storyloom_story::domain::story::StoryConfig;

/// Player progress. Serialized field names are camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Scene the player is in.
    pub current_scene: String,
    /// Current value per attribute key.
    pub attributes: BTreeMap<String, i32>,
    /// Item labels in acquisition order.
    pub inventory: Vec<String>,
    /// Granted achievements, insertion-ordered and unique.
    pub achievements: Vec<String>,
    /// Regions opened so far.
    pub unlocked_regions: Vec<String>,
    /// Regions travelled to so far.
    pub visited_regions: Vec<String>,
    /// Sum of attribute values, for stories that track it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_score: Option<i64>,
}

impl SessionState {
    /// Builds a fresh session from the story's defaults.
    ///
    /// Collections are copied, so mutating the state never alters `config`.
    #[must_use]
    pub fn new_default(config: &StoryConfig) -> Self {
        let attributes = config
            .attributes()
            .iter()
            .map(|attr| (attr.key.clone(), attr.initial_value))
            .collect();
        let mut state = Self {
            current_scene: ENTRY_SCENE.to_owned(),
            attributes,
            inventory: config.initial_inventory().to_vec(),
            achievements: Vec::new(),
            unlocked_regions: Vec::new(),
            visited_regions: Vec::new(),
            aggregate_score: None,
        };
        for name in config.initial_achievements() {
            push_unique(&mut state.achievements, name);
        }
        for region in config.initial_unlocked_regions() {
            push_unique(&mut state.unlocked_regions, region);
        }
        for region in config.initial_visited_regions() {
            push_unique(&mut state.visited_regions, region);
        }
        state.refresh_aggregate_score(config);
        state
    }

    /// Sum of every attribute value held by the state.
    #[must_use]
    pub fn attribute_total(&self) -> i64 {
        self.attributes.values().map(|v| i64::from(*v)).sum()
    }

    /// Recomputes the aggregate score when the story tracks one (or the state
    /// already carries one). Returns the new value if it changed.
    pub fn refresh_aggregate_score(&mut self, config: &StoryConfig) -> Option<i64> {
        if !config.tracks_aggregate_score() && self.aggregate_score.is_none() {
            return None;
        }
        let total = self.attribute_total();
        if self.aggregate_score == Some(total) {
            return None;
        }
        self.aggregate_score = Some(total);
        Some(total)
    }
}

/// Appends `item` unless already present. Returns `true` if appended.
pub(crate) fn push_unique(list: &mut Vec<String>, item: &str) -> bool {
    if list.iter().any(|existing| existing == item) {
        return false;
    }
    list.push(item.to_owned());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyloom_test_support::{regions_story, sample_story};

    #[test]
    fn test_new_default_starts_at_intro_with_initial_values() {
        // Arrange
        let config = sample_story();

        // Act
        let state = SessionState::new_default(&config);

        // Assert
        assert_eq!(state.current_scene, "intro");
        assert_eq!(state.attributes.get("courage"), Some(&50));
        assert_eq!(state.attributes.get("wisdom"), Some(&10));
        assert_eq!(state.inventory, vec!["Lantern".to_owned()]);
        assert!(state.achievements.is_empty());
        assert_eq!(state.aggregate_score, None);
    }

    #[test]
    fn test_new_default_copies_collections_from_config() {
        let config = sample_story();

        let mut state = SessionState::new_default(&config);
        state.inventory.push("Rope".to_owned());

        assert_eq!(config.initial_inventory(), ["Lantern".to_owned()]);
        assert_eq!(SessionState::new_default(&config).inventory.len(), 1);
    }

    #[test]
    fn test_new_default_seeds_regions_and_aggregate_score() {
        let config = regions_story();

        let state = SessionState::new_default(&config);

        assert_eq!(state.unlocked_regions, vec!["perlis".to_owned()]);
        assert!(state.visited_regions.is_empty());
        assert_eq!(state.aggregate_score, Some(0));
    }

    #[test]
    fn test_refresh_aggregate_score_tracks_attribute_sum() {
        // Arrange
        let config = regions_story();
        let mut state = SessionState::new_default(&config);
        state.attributes.insert("daulat".to_owned(), 30);
        state.attributes.insert("kekuatan".to_owned(), -10);

        // Act
        let changed = state.refresh_aggregate_score(&config);

        // Assert
        assert_eq!(changed, Some(20));
        assert_eq!(state.aggregate_score, Some(20));
        assert_eq!(state.refresh_aggregate_score(&config), None);
    }

    #[test]
    fn test_push_unique_rejects_duplicates() {
        let mut list = vec!["a".to_owned()];

        assert!(!push_unique(&mut list, "a"));
        assert!(push_unique(&mut list, "b"));
        assert_eq!(list, vec!["a".to_owned(), "b".to_owned()]);
    }
}
