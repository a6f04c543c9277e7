//! The game session controller.
//!
//! `GameSession` is the single owner of the mutable session state. Every
//! mutation goes through it, and it enforces the one ordering rule of the
//! engine: no choice or guidance request is accepted while the scene text is
//! still revealing or a guidance request is outstanding. Loading a save is
//! refused only while guidance is outstanding.

use std::sync::Arc;

use storyloom_advisor::{AdviceError, GuidanceContext, GuidanceKind, PromptEngine, TemplateError};
use storyloom_core::clock::Clock;
use storyloom_core::error::DomainError;
use storyloom_core::event::EventMetadata;
use storyloom_story::domain::action::Action;
use storyloom_story::domain::scene::{Choice, ENTRY_SCENE, Scene};
use storyloom_story::domain::document::PromptTemplates;
use storyloom_story::domain::story::StoryConfig;
use uuid::Uuid;

use crate::domain::events::{SceneReset, SessionEvent, SessionEventKind};
use crate::domain::reveal::TextReveal;
use crate::domain::state::SessionState;
use crate::domain::transition::{TransitionKind, apply_choice};

/// Why input is currently refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLock {
    /// The scene text is still being revealed.
    RevealInProgress,
    /// A guidance request has not completed.
    GuidancePending,
}

impl InputLock {
    fn describe(self) -> &'static str {
        match self {
            Self::RevealInProgress => "scene text is still being revealed",
            Self::GuidancePending => "a guidance request is outstanding",
        }
    }
}

/// A prompt ready to be sent to the advisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidanceRequest {
    pub kind: GuidanceKind,
    /// The rendered prompt. A template failure is carried here so the
    /// request still completes through the fallback reply.
    pub prompt: Result<String, TemplateError>,
}

/// Text to show the player once a guidance request completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidanceReply {
    pub text: String,
    /// `true` when `text` is the fallback message.
    pub is_fallback: bool,
}

/// Result of an accepted choice.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOutcome {
    pub kind: TransitionKind,
    pub events: Vec<SessionEvent>,
    /// Set when the choice asked for mentor guidance. Input stays locked
    /// until [`GameSession::finish_guidance`] is called.
    pub guidance: Option<GuidanceRequest>,
}

/// Owns one player's session against an immutable story.
pub struct GameSession {
    config: Arc<StoryConfig>,
    clock: Arc<dyn Clock>,
    state: SessionState,
    reveal: TextReveal,
    prompts: PromptEngine,
    guidance_pending: bool,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("game_id", &self.config.game_id())
            .field("state", &self.state)
            .field("reveal", &self.reveal)
            .field("guidance_pending", &self.guidance_pending)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Starts a fresh session at the entry scene.
    #[must_use]
    pub fn new(config: Arc<StoryConfig>, clock: Arc<dyn Clock>) -> Self {
        let state = SessionState::new_default(&config);
        Self::from_state(config, clock, state)
    }

    /// Wraps an existing state and renders its scene. An unknown scene is
    /// reset to the entry scene.
    #[must_use]
    pub fn from_state(config: Arc<StoryConfig>, clock: Arc<dyn Clock>, state: SessionState) -> Self {
        let reveal = TextReveal::completed(String::new());
        let prompts = compile_prompts(config.prompts());
        let mut session = Self {
            config,
            clock,
            state,
            reveal,
            prompts,
            guidance_pending: false,
        };
        session.render();
        session
    }

    #[must_use]
    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn reveal(&self) -> &TextReveal {
        &self.reveal
    }

    /// The scene the player is in.
    #[must_use]
    pub fn current_scene(&self) -> &Scene {
        // `render` keeps `current_scene` resolvable.
        self.config
            .scene(&self.state.current_scene)
            .unwrap_or_else(|| self.config.entry_scene())
    }

    /// Advances the reveal by one character.
    pub fn tick_reveal(&mut self) -> bool {
        self.reveal.tick()
    }

    /// Completes the reveal immediately.
    pub fn skip_reveal(&mut self) {
        self.reveal.skip();
    }

    /// Returns the reason input is refused, if it is.
    #[must_use]
    pub fn input_lock(&self) -> Option<InputLock> {
        if !self.reveal.is_complete() {
            Some(InputLock::RevealInProgress)
        } else if self.guidance_pending {
            Some(InputLock::GuidancePending)
        } else {
            None
        }
    }

    /// Choices the player may select right now; empty while input is locked.
    #[must_use]
    pub fn selectable_choices(&self) -> &[Choice] {
        if self.input_lock().is_some() {
            return &[];
        }
        &self.current_scene().choices
    }

    /// Applies the current scene's choice at `index`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InputLocked` while input is locked and
    /// `DomainError::Validation` if the scene has no such choice.
    pub fn choose(&mut self, index: usize, correlation_id: Uuid) -> Result<ChoiceOutcome, DomainError> {
        self.ensure_unlocked()?;
        let choice = self.current_scene().choices.get(index).cloned().ok_or_else(|| {
            DomainError::Validation(format!(
                "scene {} has no choice {index}",
                self.state.current_scene
            ))
        })?;
        self.apply_choice(&choice, correlation_id)
    }

    /// Applies `choice` and renders the resulting scene.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InputLocked` while input is locked.
    pub fn apply_choice(
        &mut self,
        choice: &Choice,
        correlation_id: Uuid,
    ) -> Result<ChoiceOutcome, DomainError> {
        self.ensure_unlocked()?;

        let transition = apply_choice(&mut self.state, choice, &self.config);
        let mut changes = transition.changes;

        let guidance = match transition.kind {
            TransitionKind::GuidanceRequested => Some(self.begin_guidance(GuidanceKind::Mentor)?),
            TransitionKind::Restarted => {
                tracing::info!(game_id = self.config.game_id(), "session restarted");
                changes.extend(self.render());
                None
            }
            TransitionKind::Advanced => {
                changes.extend(self.render());
                None
            }
        };

        Ok(ChoiceOutcome {
            kind: transition.kind,
            events: self.stamp(changes, correlation_id),
            guidance,
        })
    }

    /// Replaces the session with a fresh one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InputLocked` while input is locked.
    pub fn restart(&mut self, correlation_id: Uuid) -> Result<ChoiceOutcome, DomainError> {
        self.apply_choice(&Choice::new("Restart", Action::Restart), correlation_id)
    }

    /// Replaces the whole state, e.g. with one restored from a save, and
    /// renders its scene. Allowed mid-reveal, since the new scene restarts it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InputLocked` while a guidance request is
    /// outstanding.
    pub fn replace_state(
        &mut self,
        state: SessionState,
        correlation_id: Uuid,
    ) -> Result<Vec<SessionEvent>, DomainError> {
        self.ensure_no_guidance_pending()?;
        self.state = state;
        let mut changes = vec![SessionEventKind::SessionLoaded];
        changes.extend(self.render());
        Ok(self.stamp(changes, correlation_id))
    }

    /// Locks input and builds the prompt for a guidance request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InputLocked` while input is locked (including
    /// while another guidance request is outstanding) and
    /// `DomainError::Validation` if the current scene does not offer `kind`.
    pub fn begin_guidance(&mut self, kind: GuidanceKind) -> Result<GuidanceRequest, DomainError> {
        self.ensure_unlocked()?;
        let scene = self.current_scene();
        let offered = match kind {
            GuidanceKind::Mentor => true,
            GuidanceKind::Hint => scene.has_advice,
            GuidanceKind::CustomAction => scene.has_custom_action,
        };
        if !offered {
            return Err(DomainError::Validation(format!(
                "scene {} does not offer {kind:?} guidance",
                scene.id
            )));
        }

        let prompt = self.prompts.render_prompt(kind, &self.guidance_context());

        self.guidance_pending = true;
        tracing::info!(?kind, scene = %self.state.current_scene, "guidance requested");
        Ok(GuidanceRequest { kind, prompt })
    }

    /// Unlocks input and turns the advisor's answer into displayable text.
    pub fn finish_guidance(&mut self, result: Result<String, AdviceError>) -> GuidanceReply {
        self.guidance_pending = false;
        match result {
            Ok(text) => GuidanceReply {
                text,
                is_fallback: false,
            },
            Err(error) => {
                tracing::warn!(%error, "guidance request failed");
                GuidanceReply {
                    text: self.prompts.render_fallback(&error),
                    is_fallback: true,
                }
            }
        }
    }

    fn guidance_context(&self) -> GuidanceContext {
        let attributes = self
            .config
            .attributes()
            .iter()
            .map(|attr| {
                let value = self
                    .state
                    .attributes
                    .get(&attr.key)
                    .copied()
                    .unwrap_or(attr.initial_value);
                (attr.label.clone(), value)
            })
            .collect();
        GuidanceContext {
            title: self.config.title().to_owned(),
            attributes,
            scene_text: self.current_scene().text.clone(),
        }
    }

    /// Checks that no guidance request is outstanding.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InputLocked` while one is.
    pub fn ensure_no_guidance_pending(&self) -> Result<(), DomainError> {
        if self.guidance_pending {
            return Err(DomainError::InputLocked(
                InputLock::GuidancePending.describe().to_owned(),
            ));
        }
        Ok(())
    }

    fn ensure_unlocked(&self) -> Result<(), DomainError> {
        match self.input_lock() {
            Some(lock) => Err(DomainError::InputLocked(lock.describe().to_owned())),
            None => Ok(()),
        }
    }

    /// Render pass: resolves the current scene, falling back to the entry
    /// scene if it does not exist, and restarts the reveal.
    fn render(&mut self) -> Vec<SessionEventKind> {
        let mut changes = Vec::new();
        if !self.config.has_scene(&self.state.current_scene) {
            tracing::warn!(scene = %self.state.current_scene, "scene not found; resetting");
            let missing = std::mem::replace(&mut self.state.current_scene, ENTRY_SCENE.to_owned());
            changes.push(SessionEventKind::SceneReset(SceneReset {
                missing,
                to: ENTRY_SCENE.to_owned(),
            }));
        }
        tracing::info!(scene = %self.state.current_scene, "entered scene");
        self.reveal = TextReveal::start(self.current_scene().text.clone());
        changes
    }

    fn stamp(&self, changes: Vec<SessionEventKind>, correlation_id: Uuid) -> Vec<SessionEvent> {
        let occurred_at = self.clock.now();
        changes
            .into_iter()
            .map(|kind| SessionEvent {
                metadata: EventMetadata {
                    event_id: Uuid::new_v4(),
                    event_type: kind.event_type().to_owned(),
                    correlation_id,
                    occurred_at,
                },
                kind,
            })
            .collect()
    }
}

fn compile_prompts(templates: &PromptTemplates) -> PromptEngine {
    let mut engine = PromptEngine::new();
    engine.add_guidance_template(GuidanceKind::Mentor, templates.mentor.clone());
    engine.add_guidance_template(GuidanceKind::Hint, templates.hint.clone());
    engine.add_guidance_template(GuidanceKind::CustomAction, templates.custom_action.clone());
    engine.add_fallback_template(templates.fallback.clone());
    engine
}
