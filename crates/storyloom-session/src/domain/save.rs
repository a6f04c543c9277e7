//! Serializing sessions to and restoring them from a save slot.
//!
//! Restoring never fails. A missing save yields a fresh session, an
//! unreadable one is discarded, and a readable one is upgraded and then
//! reconciled with the current story: missing attributes are backfilled,
//! out-of-range values clamped, the aggregate score recomputed, and an
//! unknown scene reset to the entry scene.

use serde::Serialize;
use storyloom_story::domain::scene::ENTRY_SCENE;
use storyloom_story::domain::story::StoryConfig;

use super::migration::{CURRENT_SCHEMA_VERSION, upgrade};
use super::state::SessionState;

/// Where a restored session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOrigin {
    /// No save existed.
    Fresh,
    /// The save was read (possibly after repairs).
    Saved,
    /// The save was unreadable and replaced by a fresh session.
    Discarded,
}

/// A locally recovered fault found while restoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    /// The save did not parse and was discarded.
    PersistenceCorrupt { reason: String },
    /// The save was written under an older schema.
    SchemaUpgraded { from: u32, to: u32 },
    /// An attribute the save lacked was set to its initial value.
    AttributeBackfilled { key: String, value: i32 },
    /// A saved value lay outside the attribute's current bounds.
    AttributeClamped { key: String, from: i32, to: i32 },
    /// The aggregate score was missing or stale.
    AggregateRecomputed { value: i64 },
    /// The saved scene no longer exists.
    UnknownScene { scene: String },
}

/// Outcome of [`restore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restored {
    pub state: SessionState,
    pub origin: RestoreOrigin,
    pub recoveries: Vec<Recovery>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveDocument<'a> {
    schema_version: u32,
    #[serde(flatten)]
    state: &'a SessionState,
}

/// Serializes a session into a save document tagged with the current schema
/// version. Exact inverse of [`load_state`] for any reachable state.
#[must_use]
pub fn serialize_state(state: &SessionState) -> String {
    let document = SaveDocument {
        schema_version: CURRENT_SCHEMA_VERSION,
        state,
    };
    // String keys and integer values only; serialization cannot fail.
    serde_json::to_string(&document).expect("SessionState serialization is infallible")
}

/// Restores a session from an optional raw save, discarding the repair log.
#[must_use]
pub fn load_state(raw: Option<&str>, config: &StoryConfig) -> SessionState {
    restore(raw, config).state
}

/// Restores a session from an optional raw save.
#[must_use]
pub fn restore(raw: Option<&str>, config: &StoryConfig) -> Restored {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Restored {
            state: SessionState::new_default(config),
            origin: RestoreOrigin::Fresh,
            recoveries: Vec::new(),
        };
    };

    let mut recoveries = Vec::new();
    let (mut state, from_version) = match parse(raw) {
        Ok(parsed) => parsed,
        Err(reason) => {
            tracing::warn!(%reason, "discarding unreadable save");
            return Restored {
                state: SessionState::new_default(config),
                origin: RestoreOrigin::Discarded,
                recoveries: vec![Recovery::PersistenceCorrupt { reason }],
            };
        }
    };

    if from_version < CURRENT_SCHEMA_VERSION {
        tracing::info!(from_version, to = CURRENT_SCHEMA_VERSION, "upgraded save schema");
        recoveries.push(Recovery::SchemaUpgraded {
            from: from_version,
            to: CURRENT_SCHEMA_VERSION,
        });
    }

    reconcile(&mut state, config, &mut recoveries);

    Restored {
        state,
        origin: RestoreOrigin::Saved,
        recoveries,
    }
}

fn parse(raw: &str) -> Result<(SessionState, u32), String> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| format!("save is not valid JSON: {e}"))?;
    let upgraded = upgrade(value)?;
    let state = serde_json::from_value(serde_json::Value::Object(upgraded.fields))
        .map_err(|e| format!("save does not match the session schema: {e}"))?;
    Ok((state, upgraded.from_version))
}

fn reconcile(state: &mut SessionState, config: &StoryConfig, recoveries: &mut Vec<Recovery>) {
    for attr in config.attributes() {
        match state.attributes.get(&attr.key).copied() {
            None => {
                tracing::warn!(key = %attr.key, value = attr.initial_value, "backfilled attribute");
                state.attributes.insert(attr.key.clone(), attr.initial_value);
                recoveries.push(Recovery::AttributeBackfilled {
                    key: attr.key.clone(),
                    value: attr.initial_value,
                });
            }
            Some(value) if !attr.bounds.contains(value) => {
                let clamped = attr.bounds.clamp(i64::from(value));
                tracing::warn!(key = %attr.key, from = value, to = clamped, "clamped attribute");
                state.attributes.insert(attr.key.clone(), clamped);
                recoveries.push(Recovery::AttributeClamped {
                    key: attr.key.clone(),
                    from: value,
                    to: clamped,
                });
            }
            Some(_) => {}
        }
    }

    if let Some(value) = state.refresh_aggregate_score(config) {
        tracing::warn!(value, "recomputed aggregate score");
        recoveries.push(Recovery::AggregateRecomputed { value });
    }

    if !config.has_scene(&state.current_scene) {
        tracing::warn!(scene = %state.current_scene, "saved scene not found; resetting");
        let scene = std::mem::replace(&mut state.current_scene, ENTRY_SCENE.to_owned());
        recoveries.push(Recovery::UnknownScene { scene });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transition::apply_choice;
    use serde_json::json;
    use storyloom_story::domain::action::Action;
    use storyloom_story::domain::scene::Choice;
    use storyloom_test_support::{regions_story, sample_story};

    #[test]
    fn test_restore_without_save_is_fresh_default() {
        let config = sample_story();

        let restored = restore(None, &config);

        assert_eq!(restored.origin, RestoreOrigin::Fresh);
        assert_eq!(restored.state, SessionState::new_default(&config));
        assert!(restored.recoveries.is_empty());
    }

    #[test]
    fn test_restore_treats_blank_save_as_absent() {
        let restored = restore(Some("   "), &sample_story());

        assert_eq!(restored.origin, RestoreOrigin::Fresh);
    }

    #[test]
    fn test_restore_discards_malformed_save() {
        // Arrange
        let config = sample_story();

        // Act
        let restored = restore(Some("{\"currentScene\": "), &config);

        // Assert
        assert_eq!(restored.origin, RestoreOrigin::Discarded);
        assert_eq!(restored.state, SessionState::new_default(&config));
        assert!(matches!(
            restored.recoveries.as_slice(),
            [Recovery::PersistenceCorrupt { .. }]
        ));
    }

    #[test]
    fn test_restore_discards_save_with_wrong_field_types() {
        let raw = json!({ "currentScene": 7, "attributes": {} }).to_string();

        let restored = restore(Some(&raw), &sample_story());

        assert_eq!(restored.origin, RestoreOrigin::Discarded);
    }

    #[test]
    fn test_round_trip_of_reachable_states_is_lossless() {
        // Arrange
        let config = regions_story();
        let mut state = SessionState::new_default(&config);
        let travel = Choice::new("To Perlis", Action::Travel("perlis".to_owned()))
            .with_change("daulat", 35);
        apply_choice(&mut state, &travel, &config);
        state.inventory.push("Royal Seal".to_owned());

        // Act
        let restored = restore(Some(&serialize_state(&state)), &config);

        // Assert
        assert_eq!(restored.origin, RestoreOrigin::Saved);
        assert_eq!(restored.state, state);
        assert!(restored.recoveries.is_empty());
    }

    #[test]
    fn test_round_trip_of_default_state_is_lossless() {
        let config = sample_story();
        let state = SessionState::new_default(&config);

        assert_eq!(load_state(Some(&serialize_state(&state)), &config), state);
    }

    #[test]
    fn test_serialize_state_writes_schema_version_and_camel_case() {
        let config = sample_story();
        let state = SessionState::new_default(&config);

        let value: serde_json::Value = serde_json::from_str(&serialize_state(&state)).unwrap();

        assert_eq!(value["schemaVersion"], json!(CURRENT_SCHEMA_VERSION));
        assert_eq!(value["currentScene"], json!("intro"));
        assert_eq!(value["attributes"]["courage"], json!(50));
        assert!(value.get("aggregateScore").is_none());
    }

    #[test]
    fn test_restore_backfills_new_attribute_without_touching_others() {
        // Arrange: a save made before "wisdom" existed.
        let config = sample_story();
        let raw = json!({
            "currentScene": "forest",
            "attributes": { "courage": 70 },
            "inventory": [],
            "achievements": ["First Step"]
        })
        .to_string();

        // Act
        let restored = restore(Some(&raw), &config);

        // Assert
        assert_eq!(restored.origin, RestoreOrigin::Saved);
        assert_eq!(restored.state.attributes.get("courage"), Some(&70));
        assert_eq!(restored.state.attributes.get("wisdom"), Some(&10));
        assert_eq!(restored.state.current_scene, "forest");
        assert_eq!(restored.state.achievements, vec!["First Step".to_owned()]);
        assert!(restored.recoveries.contains(&Recovery::SchemaUpgraded { from: 0, to: 2 }));
        assert!(restored.recoveries.contains(&Recovery::AttributeBackfilled {
            key: "wisdom".to_owned(),
            value: 10,
        }));
    }

    #[test]
    fn test_restore_recomputes_missing_aggregate_score() {
        let config = regions_story();
        let raw = json!({
            "currentScene": "intro",
            "stats": { "daulat": 20, "kekuatan": -5 },
            "inventory": ["Keris"],
            "achievements": [],
            "unlockedStates": ["perlis"],
            "visitedStates": []
        })
        .to_string();

        let restored = restore(Some(&raw), &config);

        assert_eq!(restored.state.aggregate_score, Some(15));
        assert_eq!(restored.state.unlocked_regions, vec!["perlis".to_owned()]);
        assert!(restored.recoveries.contains(&Recovery::AggregateRecomputed { value: 15 }));
    }

    #[test]
    fn test_restore_clamps_values_outside_current_bounds() {
        let config = sample_story();
        let raw = json!({
            "schemaVersion": 2,
            "currentScene": "intro",
            "attributes": { "courage": 250, "wisdom": 10 },
            "inventory": [],
            "achievements": [],
            "unlockedRegions": [],
            "visitedRegions": []
        })
        .to_string();

        let restored = restore(Some(&raw), &config);

        assert_eq!(restored.state.attributes.get("courage"), Some(&100));
        assert_eq!(
            restored.recoveries,
            vec![Recovery::AttributeClamped {
                key: "courage".to_owned(),
                from: 250,
                to: 100,
            }]
        );
    }

    #[test]
    fn test_restore_resets_unknown_scene_to_entry() {
        let config = sample_story();
        let mut state = SessionState::new_default(&config);
        state.current_scene = "renamed_scene".to_owned();

        let restored = restore(Some(&serialize_state(&state)), &config);

        assert_eq!(restored.state.current_scene, "intro");
        assert_eq!(
            restored.recoveries,
            vec![Recovery::UnknownScene {
                scene: "renamed_scene".to_owned(),
            }]
        );
    }

    #[test]
    fn test_restore_keeps_values_for_attributes_no_longer_defined() {
        let config = sample_story();
        let mut state = SessionState::new_default(&config);
        state.attributes.insert("retired".to_owned(), 3);

        let restored = restore(Some(&serialize_state(&state)), &config);

        assert_eq!(restored.state.attributes.get("retired"), Some(&3));
    }
}
