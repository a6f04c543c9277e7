//! Scripted terminal sessions against in-memory doubles.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use storyloom_cli::terminal::Terminal;
use storyloom_session::application::controller::GameSession;
use storyloom_session::domain::save::serialize_state;
use storyloom_session::domain::state::SessionState;
use storyloom_test_support::{FixedClock, InMemorySaveStore, ScriptedAdvisor, sample_story};

fn new_session() -> GameSession {
    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
    GameSession::new(Arc::new(sample_story()), Arc::new(clock))
}

async fn play(script: &str, store: &InMemorySaveStore, advisor: &ScriptedAdvisor) -> (String, SessionState) {
    play_with_delay(script, store, advisor, Duration::ZERO).await
}

async fn play_with_delay(
    script: &str,
    store: &InMemorySaveStore,
    advisor: &ScriptedAdvisor,
    typewriter_delay: Duration,
) -> (String, SessionState) {
    let mut terminal = Terminal::new(
        new_session(),
        store,
        advisor,
        Cursor::new(script.to_owned()),
        Vec::new(),
        typewriter_delay,
    );
    terminal.run().await.unwrap();
    let state = terminal.session().state().clone();
    let output = String::from_utf8(terminal.into_output()).unwrap();
    (output, state)
}

#[tokio::test]
async fn test_scripted_playthrough_reports_changes_and_saves() {
    // Arrange
    let store = InMemorySaveStore::new();
    let advisor = ScriptedAdvisor::default();

    // Act
    let (output, state) = play("1\ni\ns\nq\n", &store, &advisor).await;

    // Assert
    assert!(output.contains("== Forest Tale =="));
    assert!(output.contains("You stand at the edge of a dark forest."));
    assert!(output.contains("  1. Enter the forest"));
    assert!(output.contains("* Courage +20 (now 70)"));
    assert!(output.contains("* Achievement unlocked: First Step"));
    assert!(output.contains("Trees close in around you."));
    assert!(output.contains("🦁 Courage: 70 [0..100]"));
    assert!(output.contains("Game saved."));
    assert!(output.ends_with("Farewell.\n"));
    assert_eq!(state.current_scene, "forest");
    assert_eq!(store.slot("forest-tale"), Some(serialize_state(&state)));
}

#[tokio::test]
async fn test_startup_restores_saved_game() {
    // Arrange
    let mut saved = SessionState::new_default(&sample_story());
    saved.current_scene = "forest".to_owned();
    let store = InMemorySaveStore::with_slot("forest-tale", &serialize_state(&saved));

    // Act
    let (output, state) = play("q\n", &store, &ScriptedAdvisor::default()).await;

    // Assert
    assert!(output.contains("Saved game restored."));
    assert!(output.contains("  [x] Special action"));
    assert_eq!(state, saved);
}

#[tokio::test]
async fn test_corrupt_save_is_discarded_and_play_continues() {
    let store = InMemorySaveStore::with_slot("forest-tale", "{{{");

    let (output, state) = play("1\n", &store, &ScriptedAdvisor::default()).await;

    assert!(output.contains("could not be read and was discarded"));
    assert_eq!(state.current_scene, "forest");
}

#[tokio::test]
async fn test_hint_shows_advisor_text_and_failure_fallback() {
    // Arrange
    let advisor = ScriptedAdvisor::answering("Light reveals what darkness hides.");

    // Act
    let (output, _) = play("h\nh\n", &InMemorySaveStore::new(), &advisor).await;

    // Assert
    assert!(output.contains("Light reveals what darkness hides."));
    assert!(output.contains("Sorry, there was an error contacting the AI advisor."));
    assert_eq!(advisor.prompts().len(), 2);
}

#[tokio::test]
async fn test_invalid_input_is_reported_without_changing_state() {
    let (output, state) = play("9\nx\ndance\n", &InMemorySaveStore::new(), &ScriptedAdvisor::default()).await;

    assert!(output.contains("! validation error: scene intro has no choice 8"));
    assert!(output.contains("! validation error: scene intro does not offer CustomAction guidance"));
    assert!(output.contains("Unknown command: dance"));
    assert_eq!(state, SessionState::new_default(&sample_story()));
}

#[tokio::test]
async fn test_restart_command_persists_fresh_state() {
    let store = InMemorySaveStore::new();

    let (output, state) = play("1\nr\n", &store, &ScriptedAdvisor::default()).await;

    let fresh = SessionState::new_default(&sample_story());
    assert_eq!(state, fresh);
    assert_eq!(store.slot("forest-tale"), Some(serialize_state(&fresh)));
    assert!(output.matches("You stand at the edge of a dark forest.").count() >= 2);
}

#[tokio::test]
async fn test_enter_skips_reveal_and_shows_choices() {
    // Arrange
    let delay = Duration::from_millis(200);

    // Act
    let (output, state) = play_with_delay(
        "\n1\nk\nq\n",
        &InMemorySaveStore::new(),
        &ScriptedAdvisor::default(),
        delay,
    )
    .await;

    // Assert
    assert_eq!(output.matches("You stand at the edge of a dark forest.").count(), 1);
    assert!(output.contains("  1. Enter the forest"));
    assert!(output.contains("Trees close in around you. Something howls."));
    assert!(output.contains("  3. Start over"));
    assert!(!output.contains("Unknown command"));
    assert_eq!(state.current_scene, "forest");
    assert!(output.ends_with("Farewell.\n"));
}

#[tokio::test]
async fn test_command_typed_during_reveal_runs_after_skipping() {
    let (output, state) = play_with_delay(
        "1\nq\n",
        &InMemorySaveStore::new(),
        &ScriptedAdvisor::default(),
        Duration::from_millis(200),
    )
    .await;

    assert!(output.contains("You stand at the edge of a dark forest."));
    assert!(output.contains("* Courage +20 (now 70)"));
    assert!(output.contains("Trees close in around you. Something howls."));
    assert_eq!(state.current_scene, "forest");
}
