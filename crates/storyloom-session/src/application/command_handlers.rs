//! Command handlers for the session engine.
//!
//! Each handler orchestrates one command against a [`GameSession`]: read or
//! write the save slot, apply the domain transition, and call the advisor when
//! guidance is requested. The save slot key is the story's `gameId`.

use storyloom_advisor::Advisor;
use storyloom_core::command::Command;
use storyloom_core::error::DomainError;
use storyloom_core::store::SaveStore;
use tracing::instrument;

use crate::application::controller::{ChoiceOutcome, GameSession, GuidanceReply, GuidanceRequest};
use crate::domain::commands::{ApplyChoice, LoadGame, RequestGuidance, RestartGame, SaveGame};
use crate::domain::events::SessionEvent;
use crate::domain::save::{Recovery, RestoreOrigin, restore, serialize_state};
use crate::domain::transition::TransitionKind;

/// Result of a handled `LoadGame` command.
#[derive(Debug)]
pub struct LoadGameResult {
    /// Where the restored state came from.
    pub origin: RestoreOrigin,
    /// Faults recovered while restoring.
    pub recoveries: Vec<Recovery>,
    /// Events produced by entering the restored scene.
    pub events: Vec<SessionEvent>,
}

/// Result of a handled choice or restart.
#[derive(Debug)]
pub struct ChoiceResult {
    pub kind: TransitionKind,
    pub events: Vec<SessionEvent>,
    /// The advisor's reply when the choice asked for mentor guidance.
    pub guidance: Option<GuidanceReply>,
}

async fn persist(session: &GameSession, store: &dyn SaveStore) -> Result<(), DomainError> {
    let key = session.config().game_id();
    store.write(key, &serialize_state(session.state())).await?;
    tracing::info!(slot = key, "session saved");
    Ok(())
}

async fn perform_guidance(
    session: &mut GameSession,
    request: GuidanceRequest,
    advisor: &dyn Advisor,
) -> GuidanceReply {
    let result = match request.prompt {
        Ok(prompt) => advisor.request_guidance(&prompt).await,
        Err(error) => Err(error.into()),
    };
    session.finish_guidance(result)
}

async fn complete_choice(
    session: &mut GameSession,
    outcome: ChoiceOutcome,
    store: &dyn SaveStore,
    advisor: &dyn Advisor,
) -> Result<ChoiceResult, DomainError> {
    if outcome.kind == TransitionKind::Restarted {
        persist(session, store).await?;
    }
    let guidance = match outcome.guidance {
        Some(request) => Some(perform_guidance(session, request, advisor).await),
        None => None,
    };
    Ok(ChoiceResult {
        kind: outcome.kind,
        events: outcome.events,
        guidance,
    })
}

/// Handles the `LoadGame` command: reads the save slot and replaces the
/// session state with the restored one.
///
/// A missing or unreadable save is not an error; see [`RestoreOrigin`].
///
/// # Errors
///
/// Returns `DomainError::InputLocked` while a guidance request is outstanding
/// and `DomainError::Infrastructure` if the slot cannot be read. The session
/// is left untouched in both cases.
#[instrument(skip_all, fields(command_type = command.command_type(), correlation_id = %command.correlation_id()))]
pub async fn handle_load_game(
    command: &LoadGame,
    session: &mut GameSession,
    store: &dyn SaveStore,
) -> Result<LoadGameResult, DomainError> {
    session.ensure_no_guidance_pending()?;
    let raw = store.read(session.config().game_id()).await?;
    let restored = restore(raw.as_deref(), session.config());
    tracing::info!(origin = ?restored.origin, recoveries = restored.recoveries.len(), "session loaded");

    let events = session.replace_state(restored.state, command.correlation_id)?;
    Ok(LoadGameResult {
        origin: restored.origin,
        recoveries: restored.recoveries,
        events,
    })
}

/// Handles the `SaveGame` command: writes the whole session to the save slot.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the slot cannot be written.
#[instrument(skip_all, fields(command_type = command.command_type(), correlation_id = %command.correlation_id()))]
pub async fn handle_save_game(
    command: &SaveGame,
    session: &GameSession,
    store: &dyn SaveStore,
) -> Result<(), DomainError> {
    persist(session, store).await
}

/// Handles the `ApplyChoice` command: applies the selected choice, persists
/// the session after a restart, and asks the advisor when the choice requests
/// mentor guidance.
///
/// # Errors
///
/// Returns `DomainError::InputLocked` while input is locked,
/// `DomainError::Validation` for an index the scene does not have, and
/// `DomainError::Infrastructure` if persisting a restart fails.
#[instrument(skip_all, fields(command_type = command.command_type(), correlation_id = %command.correlation_id()))]
pub async fn handle_apply_choice(
    command: &ApplyChoice,
    session: &mut GameSession,
    store: &dyn SaveStore,
    advisor: &dyn Advisor,
) -> Result<ChoiceResult, DomainError> {
    let outcome = session.choose(command.choice_index, command.correlation_id)?;
    complete_choice(session, outcome, store, advisor).await
}

/// Handles the `RestartGame` command: replaces the session with a fresh one
/// and persists it.
///
/// # Errors
///
/// Returns `DomainError::InputLocked` while input is locked and
/// `DomainError::Infrastructure` if persisting fails.
#[instrument(skip_all, fields(command_type = command.command_type(), correlation_id = %command.correlation_id()))]
pub async fn handle_restart_game(
    command: &RestartGame,
    session: &mut GameSession,
    store: &dyn SaveStore,
) -> Result<ChoiceResult, DomainError> {
    let outcome = session.restart(command.correlation_id)?;
    persist(session, store).await?;
    Ok(ChoiceResult {
        kind: outcome.kind,
        events: outcome.events,
        guidance: None,
    })
}

/// Handles the `RequestGuidance` command: builds the prompt for the current
/// scene, calls the advisor, and returns displayable text. Advisor failures
/// come back as fallback text, never as `Err`.
///
/// # Errors
///
/// Returns `DomainError::InputLocked` while input is locked and
/// `DomainError::Validation` if the scene does not offer the requested kind.
#[instrument(skip_all, fields(command_type = command.command_type(), correlation_id = %command.correlation_id()))]
pub async fn handle_request_guidance(
    command: &RequestGuidance,
    session: &mut GameSession,
    advisor: &dyn Advisor,
) -> Result<GuidanceReply, DomainError> {
    let request = session.begin_guidance(command.kind)?;
    if let Ok(prompt) = &request.prompt {
        tracing::debug!(kind = ?command.kind, prompt_len = prompt.len(), "sending guidance prompt");
    }
    Ok(perform_guidance(session, request, advisor).await)
}
