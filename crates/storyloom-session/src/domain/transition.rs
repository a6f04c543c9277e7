//! The choice transition.
//!
//! Rules run in a fixed order: restart short-circuits everything, an advice
//! request mutates nothing, and otherwise attribute deltas, the left scene's
//! achievement and unlock, travel bookkeeping, the aggregate score and
//! finally the scene pointer are updated.

use storyloom_story::domain::action::Action;
use storyloom_story::domain::scene::Choice;
use storyloom_story::domain::story::StoryConfig;

use super::events::{
    AchievementGranted, AttributeChanged, RegionUnlocked, RegionVisited, SceneEntered,
    SessionEventKind,
};
use super::state::{SessionState, push_unique};

/// Which branch of the transition ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// The state was replaced with a fresh session.
    Restarted,
    /// Mentor guidance was requested; state untouched.
    GuidanceRequested,
    /// The player moved to the choice's target scene.
    Advanced,
}

/// Result of applying a choice to a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub kind: TransitionKind,
    /// What changed, in the order it happened.
    pub changes: Vec<SessionEventKind>,
}

/// Applies `choice` to `state` in place.
///
/// Deltas for attribute keys the story does not define are ignored. The new
/// `current_scene` is not checked against the graph here; the next render
/// pass resets an unknown scene to the entry scene.
pub fn apply_choice(state: &mut SessionState, choice: &Choice, config: &StoryConfig) -> Transition {
    let target = match &choice.action {
        Action::Restart => {
            *state = SessionState::new_default(config);
            return Transition {
                kind: TransitionKind::Restarted,
                changes: vec![SessionEventKind::SessionRestarted],
            };
        }
        Action::RequestAdvice => {
            return Transition {
                kind: TransitionKind::GuidanceRequested,
                changes: Vec::new(),
            };
        }
        Action::Travel(_) | Action::GoTo(_) => choice.action.target_scene().unwrap_or_default(),
    };

    let mut changes = Vec::new();

    for (key, delta) in &choice.attribute_changes {
        let Some(definition) = config.attribute(key) else {
            tracing::debug!(%key, "ignoring delta for undefined attribute");
            continue;
        };
        let previous = state
            .attributes
            .get(key)
            .copied()
            .unwrap_or(definition.initial_value);
        let current = definition.bounds.apply_delta(previous, *delta);
        state.attributes.insert(key.clone(), current);
        tracing::debug!(%key, previous, current, delta, "attribute changed");
        changes.push(SessionEventKind::AttributeChanged(AttributeChanged {
            key: key.clone(),
            previous,
            current,
            delta: *delta,
        }));
    }

    if let Some(scene) = config.scene(&state.current_scene) {
        if let Some(name) = &scene.achievement {
            if push_unique(&mut state.achievements, name) {
                changes.push(SessionEventKind::AchievementGranted(AchievementGranted {
                    name: name.clone(),
                }));
            }
        }
        if let Some(region) = &scene.unlocks {
            if push_unique(&mut state.unlocked_regions, region) {
                changes.push(SessionEventKind::RegionUnlocked(RegionUnlocked {
                    region: region.clone(),
                    name: config.region(region).map(|r| r.name.clone()),
                }));
            }
        }
    }

    if let Action::Travel(region) = &choice.action {
        if push_unique(&mut state.visited_regions, region) {
            changes.push(SessionEventKind::RegionVisited(RegionVisited {
                region: region.clone(),
            }));
        }
    }

    state.refresh_aggregate_score(config);

    let from = std::mem::replace(&mut state.current_scene, target.clone());
    changes.push(SessionEventKind::SceneEntered(SceneEntered { from, to: target }));

    Transition {
        kind: TransitionKind::Advanced,
        changes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyloom_test_support::{regions_story, sample_story};

    fn forest_choice() -> Choice {
        Choice::new("Enter the forest", Action::GoTo("forest".to_owned())).with_change("courage", 20)
    }

    #[test]
    fn test_apply_choice_end_to_end_example() {
        // Arrange
        let config = sample_story();
        let mut state = SessionState::new_default(&config);
        state.inventory.clear();

        // Act
        let transition = apply_choice(&mut state, &forest_choice(), &config);

        // Assert
        assert_eq!(transition.kind, TransitionKind::Advanced);
        assert_eq!(state.current_scene, "forest");
        assert_eq!(state.attributes.get("courage"), Some(&70));
        assert!(state.inventory.is_empty());
        assert_eq!(state.achievements, vec!["First Step".to_owned()]);
        assert_eq!(
            transition.changes,
            vec![
                SessionEventKind::AttributeChanged(AttributeChanged {
                    key: "courage".to_owned(),
                    previous: 50,
                    current: 70,
                    delta: 20,
                }),
                SessionEventKind::AchievementGranted(AchievementGranted {
                    name: "First Step".to_owned(),
                }),
                SessionEventKind::SceneEntered(SceneEntered {
                    from: "intro".to_owned(),
                    to: "forest".to_owned(),
                }),
            ]
        );
    }

    #[test]
    fn test_apply_choice_clamps_cumulative_deltas_to_upper_bound() {
        let config = sample_story();
        let mut state = SessionState::new_default(&config);
        state.attributes.insert("courage".to_owned(), 0);
        let choice =
            Choice::new("Charge", Action::GoTo("intro".to_owned())).with_change("courage", 80);

        apply_choice(&mut state, &choice, &config);
        apply_choice(&mut state, &choice, &config);

        assert_eq!(state.attributes.get("courage"), Some(&100));
    }

    #[test]
    fn test_apply_choice_clamps_to_symmetric_lower_bound() {
        let config = regions_story();
        let mut state = SessionState::new_default(&config);
        let choice = Choice::new("Fight", Action::GoTo("intro".to_owned()))
            .with_change("kekuatan", -150);

        let transition = apply_choice(&mut state, &choice, &config);

        assert_eq!(state.attributes.get("kekuatan"), Some(&-100));
        assert_eq!(
            transition.changes[0],
            SessionEventKind::AttributeChanged(AttributeChanged {
                key: "kekuatan".to_owned(),
                previous: 0,
                current: -100,
                delta: -150,
            })
        );
    }

    #[test]
    fn test_apply_choice_ignores_undefined_attribute_keys() {
        let config = sample_story();
        let mut state = SessionState::new_default(&config);
        let before = state.attributes.clone();
        let choice = Choice::new("Odd", Action::GoTo("forest".to_owned())).with_change("luck", 5);

        let transition = apply_choice(&mut state, &choice, &config);

        assert_eq!(state.attributes, before);
        assert!(!transition
            .changes
            .iter()
            .any(|c| matches!(c, SessionEventKind::AttributeChanged(_))));
    }

    #[test]
    fn test_apply_choice_never_grants_achievement_twice() {
        // Arrange
        let config = sample_story();
        let mut state = SessionState::new_default(&config);
        let back = Choice::new("Back", Action::GoTo("intro".to_owned()));

        // Act
        apply_choice(&mut state, &forest_choice(), &config);
        apply_choice(&mut state, &back, &config);
        let again = apply_choice(&mut state, &forest_choice(), &config);

        // Assert
        assert_eq!(
            state.achievements,
            vec!["First Step".to_owned(), "Into the Woods".to_owned()]
        );
        assert!(!again
            .changes
            .iter()
            .any(|c| matches!(c, SessionEventKind::AchievementGranted(_))));
    }

    #[test]
    fn test_apply_choice_restart_replaces_state_with_default() {
        let config = sample_story();
        let mut state = SessionState::new_default(&config);
        apply_choice(&mut state, &forest_choice(), &config);

        let transition = apply_choice(&mut state, &Choice::new("Again", Action::Restart), &config);

        assert_eq!(transition.kind, TransitionKind::Restarted);
        assert_eq!(transition.changes, vec![SessionEventKind::SessionRestarted]);
        assert_eq!(state, SessionState::new_default(&config));
    }

    #[test]
    fn test_apply_choice_advice_request_leaves_state_untouched() {
        let config = sample_story();
        let mut state = SessionState::new_default(&config);
        let before = state.clone();
        let choice = Choice::new("Mentor", Action::RequestAdvice).with_change("courage", 10);

        let transition = apply_choice(&mut state, &choice, &config);

        assert_eq!(transition.kind, TransitionKind::GuidanceRequested);
        assert!(transition.changes.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn test_apply_choice_unlocks_and_visits_regions_once() {
        // Arrange
        let config = regions_story();
        let mut state = SessionState::new_default(&config);
        let travel = Choice::new("To Perlis", Action::Travel("perlis".to_owned()))
            .with_change("daulat", 10);
        let back = Choice::new("Back", Action::GoTo("intro".to_owned()));

        // Act
        let first = apply_choice(&mut state, &travel, &config);
        apply_choice(&mut state, &back, &config);
        let second = apply_choice(&mut state, &travel, &config);

        // Assert
        assert_eq!(state.current_scene, "travel_perlis");
        assert_eq!(
            state.unlocked_regions,
            vec!["perlis".to_owned(), "kedah".to_owned()]
        );
        assert_eq!(state.visited_regions, vec!["perlis".to_owned()]);
        assert!(first.changes.contains(&SessionEventKind::RegionUnlocked(RegionUnlocked {
            region: "kedah".to_owned(),
            name: Some("Kedah".to_owned()),
        })));
        assert!(first.changes.contains(&SessionEventKind::RegionVisited(RegionVisited {
            region: "perlis".to_owned(),
        })));
        assert!(!second
            .changes
            .iter()
            .any(|c| matches!(
                c,
                SessionEventKind::RegionUnlocked(_) | SessionEventKind::RegionVisited(_)
            )));
    }

    #[test]
    fn test_apply_choice_keeps_aggregate_score_equal_to_attribute_sum() {
        let config = regions_story();
        let mut state = SessionState::new_default(&config);
        let choice = Choice::new("Serve", Action::GoTo("intro".to_owned()))
            .with_change("daulat", 40)
            .with_change("kekuatan", -15);

        apply_choice(&mut state, &choice, &config);

        assert_eq!(state.aggregate_score, Some(25));
        assert_eq!(state.aggregate_score, Some(state.attribute_total()));
    }

    #[test]
    fn test_apply_choice_sets_unknown_target_without_failing() {
        let config = sample_story();
        let mut state = SessionState::new_default(&config);
        let choice = Choice::new("Wander", Action::GoTo("nowhere".to_owned()));

        let transition = apply_choice(&mut state, &choice, &config);

        assert_eq!(transition.kind, TransitionKind::Advanced);
        assert_eq!(state.current_scene, "nowhere");
    }
}
