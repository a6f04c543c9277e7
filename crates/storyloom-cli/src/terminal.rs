//! Interactive play loop over a line-based reader and writer.
//!
//! Input is read asynchronously so the typewriter reveal can be cut short:
//! any line typed while the scene text is appearing completes it at once.

use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use storyloom_advisor::{Advisor, GuidanceKind};
use storyloom_core::error::DomainError;
use storyloom_core::event::DomainEvent;
use storyloom_core::store::SaveStore;
use storyloom_session::application::command_handlers::{
    ChoiceResult, handle_apply_choice, handle_load_game, handle_request_guidance,
    handle_restart_game, handle_save_game,
};
use storyloom_session::application::controller::{GameSession, GuidanceReply};
use storyloom_session::application::query_handlers::{scene_view, sidebar_view};
use storyloom_session::domain::commands::{
    ApplyChoice, LoadGame, RequestGuidance, RestartGame, SaveGame,
};
use storyloom_session::domain::events::{SessionEvent, SessionEventKind};
use storyloom_session::domain::save::RestoreOrigin;
use storyloom_session::domain::transition::TransitionKind;
use storyloom_story::domain::story::StoryConfig;
use uuid::Uuid;

use crate::error::AppError;

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalCommand {
    /// Zero-based index into the displayed choices.
    Choose(usize),
    Save,
    Load,
    Restart,
    Hint,
    CustomAction,
    Status,
    Quit,
}

impl TerminalCommand {
    /// Parses a line of input. Choice numbers are one-based, as displayed.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if let Ok(number) = line.parse::<usize>() {
            return number.checked_sub(1).map(Self::Choose);
        }
        match line.to_ascii_lowercase().as_str() {
            "s" | "save" => Some(Self::Save),
            "l" | "load" => Some(Self::Load),
            "r" | "restart" => Some(Self::Restart),
            "h" | "hint" => Some(Self::Hint),
            "x" | "action" => Some(Self::CustomAction),
            "i" | "status" => Some(Self::Status),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Returns `true` for a line that only asks to skip the reveal.
fn is_skip(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.eq_ignore_ascii_case("k")
}

/// Player-facing notification for a transition event, if it warrants one.
#[must_use]
pub fn describe_event(event: &SessionEvent, config: &StoryConfig) -> Option<String> {
    match &event.kind {
        SessionEventKind::AttributeChanged(change) => {
            let label = config
                .attribute(&change.key)
                .map_or(change.key.as_str(), |attr| attr.label.as_str());
            Some(format!("{label} {:+} (now {})", change.delta, change.current))
        }
        SessionEventKind::AchievementGranted(granted) => {
            Some(format!("Achievement unlocked: {}", granted.name))
        }
        SessionEventKind::RegionUnlocked(unlocked) => Some(format!(
            "Region opened: {}",
            unlocked.name.as_deref().unwrap_or(&unlocked.region)
        )),
        SessionEventKind::SceneReset(_) => {
            Some("The path fades away. You find yourself back at the beginning.".to_owned())
        }
        SessionEventKind::RegionVisited(_)
        | SessionEventKind::SceneEntered(_)
        | SessionEventKind::SessionRestarted
        | SessionEventKind::SessionLoaded => None,
    }
}

/// Drives a [`GameSession`] from text commands.
pub struct Terminal<'a, R, W> {
    session: GameSession,
    store: &'a dyn SaveStore,
    advisor: &'a dyn Advisor,
    input: Lines<R>,
    input_closed: bool,
    /// A command typed during a reveal, run once the reveal completes.
    pending_line: Option<String>,
    output: W,
    typewriter_delay: Duration,
}

impl<'a, R: AsyncBufRead + Unpin, W: Write> Terminal<'a, R, W> {
    #[must_use]
    pub fn new(
        session: GameSession,
        store: &'a dyn SaveStore,
        advisor: &'a dyn Advisor,
        input: R,
        output: W,
        typewriter_delay: Duration,
    ) -> Self {
        Self {
            session,
            store,
            advisor,
            input: input.lines(),
            input_closed: false,
            pending_line: None,
            output,
            typewriter_delay,
        }
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Consumes the terminal, returning the writer.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Restores the saved game, then plays until `q` or end of input.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the terminal cannot be read or written.
    /// Save slot failures are reported to the player and play continues.
    pub async fn run(&mut self) -> Result<(), AppError> {
        self.print_title()?;
        self.load(false).await?;
        self.reveal_scene().await?;

        loop {
            let line = match self.pending_line.take() {
                Some(line) => line,
                None => {
                    write!(self.output, "> ")?;
                    self.output.flush()?;
                    match self.next_line().await? {
                        Some(line) => line,
                        None => break,
                    }
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let Some(command) = TerminalCommand::parse(&line) else {
                writeln!(self.output, "Unknown command: {}", line.trim())?;
                self.print_commands()?;
                continue;
            };
            if command == TerminalCommand::Quit {
                break;
            }
            self.execute(command).await?;
        }

        writeln!(self.output, "Farewell.")?;
        Ok(())
    }

    async fn next_line(&mut self) -> Result<Option<String>, AppError> {
        if self.input_closed {
            return Ok(None);
        }
        let line = self.input.next_line().await?;
        self.input_closed = line.is_none();
        Ok(line)
    }

    async fn execute(&mut self, command: TerminalCommand) -> Result<(), AppError> {
        match command {
            TerminalCommand::Choose(index) => {
                let command = ApplyChoice {
                    correlation_id: Uuid::new_v4(),
                    choice_index: index,
                };
                match handle_apply_choice(&command, &mut self.session, self.store, self.advisor)
                    .await
                {
                    Ok(result) => self.show_choice_result(result).await?,
                    Err(err) => self.report(&err)?,
                }
            }
            TerminalCommand::Save => {
                let command = SaveGame {
                    correlation_id: Uuid::new_v4(),
                };
                match handle_save_game(&command, &self.session, self.store).await {
                    Ok(()) => writeln!(self.output, "Game saved.")?,
                    Err(err) => self.report(&err)?,
                }
            }
            TerminalCommand::Load => {
                if self.load(true).await? {
                    self.reveal_scene().await?;
                }
            }
            TerminalCommand::Restart => {
                let command = RestartGame {
                    correlation_id: Uuid::new_v4(),
                };
                match handle_restart_game(&command, &mut self.session, self.store).await {
                    Ok(result) => self.show_choice_result(result).await?,
                    Err(err) => self.report(&err)?,
                }
            }
            TerminalCommand::Hint => self.guidance(GuidanceKind::Hint).await?,
            TerminalCommand::CustomAction => self.guidance(GuidanceKind::CustomAction).await?,
            TerminalCommand::Status => self.print_sidebar()?,
            TerminalCommand::Quit => {}
        }
        Ok(())
    }

    /// Returns `true` if the session state was replaced.
    async fn load(&mut self, explicit: bool) -> Result<bool, AppError> {
        let command = LoadGame {
            correlation_id: Uuid::new_v4(),
        };
        let result = match handle_load_game(&command, &mut self.session, self.store).await {
            Ok(result) => result,
            Err(err) => {
                self.report(&err)?;
                return Ok(false);
            }
        };

        match result.origin {
            RestoreOrigin::Saved => writeln!(self.output, "Saved game restored.")?,
            RestoreOrigin::Discarded => writeln!(
                self.output,
                "The saved game could not be read and was discarded. Starting fresh."
            )?,
            RestoreOrigin::Fresh if explicit => {
                writeln!(self.output, "No saved game found. Starting fresh.")?;
            }
            RestoreOrigin::Fresh => {}
        }
        self.print_events(&result.events)?;
        Ok(true)
    }

    async fn guidance(&mut self, kind: GuidanceKind) -> Result<(), AppError> {
        let command = RequestGuidance {
            correlation_id: Uuid::new_v4(),
            kind,
        };
        writeln!(self.output, "Consulting the advisor...")?;
        match handle_request_guidance(&command, &mut self.session, self.advisor).await {
            Ok(reply) => {
                self.print_guidance(&reply)?;
                self.print_choices()?;
            }
            Err(err) => self.report(&err)?,
        }
        Ok(())
    }

    async fn show_choice_result(&mut self, result: ChoiceResult) -> Result<(), AppError> {
        self.print_events(&result.events)?;
        if let Some(reply) = &result.guidance {
            self.print_guidance(reply)?;
        }
        match result.kind {
            TransitionKind::GuidanceRequested => self.print_choices()?,
            TransitionKind::Advanced | TransitionKind::Restarted => self.reveal_scene().await?,
        }
        Ok(())
    }

    async fn reveal_scene(&mut self) -> Result<(), AppError> {
        writeln!(self.output)?;
        if self.typewriter_delay.is_zero() {
            self.session.skip_reveal();
            write!(self.output, "{}", self.session.reveal().visible_text())?;
        } else {
            self.type_out().await?;
        }
        writeln!(self.output)?;
        self.print_choices()
    }

    /// Writes the scene text one character per tick until it is complete or
    /// the player enters a line. A line other than Enter or `k` is kept as
    /// the next command.
    async fn type_out(&mut self) -> Result<(), AppError> {
        loop {
            let shown = self.session.reveal().visible_text().len();
            if !self.session.tick_reveal() {
                return Ok(());
            }
            write!(self.output, "{}", &self.session.reveal().visible_text()[shown..])?;
            self.output.flush()?;

            if self.input_closed {
                tokio::time::sleep(self.typewriter_delay).await;
                continue;
            }
            tokio::select! {
                () = tokio::time::sleep(self.typewriter_delay) => {}
                line = self.input.next_line() => match line? {
                    Some(line) => {
                        let shown = self.session.reveal().visible_text().len();
                        self.session.skip_reveal();
                        write!(self.output, "{}", &self.session.reveal().visible_text()[shown..])?;
                        if !is_skip(&line) {
                            self.pending_line = Some(line);
                        }
                        return Ok(());
                    }
                    None => self.input_closed = true,
                },
            }
        }
    }

    fn print_title(&mut self) -> Result<(), AppError> {
        let config = self.session.config();
        writeln!(self.output, "== {} ==", config.title())?;
        if let Some(subtitle) = config.subtitle() {
            writeln!(self.output, "{subtitle}")?;
        }
        Ok(())
    }

    fn print_choices(&mut self) -> Result<(), AppError> {
        let view = scene_view(&self.session);
        writeln!(self.output)?;
        if view.choices.is_empty() && !view.revealing {
            writeln!(self.output, "The story ends here. Type r to restart.")?;
        }
        for choice in &view.choices {
            writeln!(self.output, "  {}. {}", choice.index + 1, choice.text)?;
        }
        if view.hint_available {
            writeln!(self.output, "  [h] Ask for a hint")?;
        }
        if view.custom_action_available {
            writeln!(self.output, "  [x] Special action")?;
        }
        Ok(())
    }

    fn print_commands(&mut self) -> Result<(), AppError> {
        writeln!(
            self.output,
            "Commands: <number> choose, s save, l load, r restart, h hint, x special action, i status, q quit (Enter or k skips the text)"
        )?;
        Ok(())
    }

    fn print_events(&mut self, events: &[SessionEvent]) -> Result<(), AppError> {
        for event in events {
            tracing::debug!(
                event_type = event.event_type(),
                correlation_id = %event.metadata().correlation_id,
                "session event"
            );
            if let Some(note) = describe_event(event, self.session.config()) {
                writeln!(self.output, "* {note}")?;
            }
        }
        Ok(())
    }

    fn print_guidance(&mut self, reply: &GuidanceReply) -> Result<(), AppError> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", reply.text)?;
        Ok(())
    }

    fn print_sidebar(&mut self) -> Result<(), AppError> {
        let view = sidebar_view(&self.session);
        writeln!(self.output, "-- {} --", view.title)?;
        for attr in &view.attributes {
            let icon = attr.icon.as_deref().map_or(String::new(), |icon| format!("{icon} "));
            writeln!(
                self.output,
                "{icon}{}: {} [{}..{}]",
                attr.label, attr.value, attr.min_value, attr.max_value
            )?;
        }
        if let Some(score) = view.aggregate_score {
            writeln!(self.output, "Overall: {score}")?;
        }
        writeln!(self.output, "Inventory: {}", list_or_none(&view.inventory))?;
        writeln!(self.output, "Achievements: {}", list_or_none(&view.achievements))?;
        if !view.unlocked_regions.is_empty() {
            let regions: Vec<String> = view
                .unlocked_regions
                .iter()
                .map(|region| {
                    if region.visited {
                        format!("{} (visited)", region.name)
                    } else {
                        region.name.clone()
                    }
                })
                .collect();
            writeln!(self.output, "Regions: {}", regions.join(", "))?;
        }
        for tip in &view.tips {
            writeln!(self.output, "Tip: {tip}")?;
        }
        Ok(())
    }

    fn report(&mut self, err: &DomainError) -> Result<(), AppError> {
        tracing::warn!(%err, "command rejected");
        writeln!(self.output, "! {err}")?;
        Ok(())
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_owned()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use storyloom_core::event::EventMetadata;
    use storyloom_session::domain::events::{AttributeChanged, RegionUnlocked};
    use storyloom_test_support::{regions_story, sample_story};

    use super::*;

    fn event(kind: SessionEventKind) -> SessionEvent {
        SessionEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                correlation_id: Uuid::new_v4(),
                occurred_at: Utc::now(),
            },
            kind,
        }
    }

    #[test]
    fn test_parse_accepts_one_based_choice_numbers() {
        assert_eq!(TerminalCommand::parse("1\n"), Some(TerminalCommand::Choose(0)));
        assert_eq!(TerminalCommand::parse(" 3 "), Some(TerminalCommand::Choose(2)));
        assert_eq!(TerminalCommand::parse("0"), None);
    }

    #[test]
    fn test_parse_accepts_letter_commands() {
        assert_eq!(TerminalCommand::parse("s"), Some(TerminalCommand::Save));
        assert_eq!(TerminalCommand::parse("L"), Some(TerminalCommand::Load));
        assert_eq!(TerminalCommand::parse("r"), Some(TerminalCommand::Restart));
        assert_eq!(TerminalCommand::parse("h"), Some(TerminalCommand::Hint));
        assert_eq!(TerminalCommand::parse("x"), Some(TerminalCommand::CustomAction));
        assert_eq!(TerminalCommand::parse("i"), Some(TerminalCommand::Status));
        assert_eq!(TerminalCommand::parse("quit"), Some(TerminalCommand::Quit));
        assert_eq!(TerminalCommand::parse("dance"), None);
    }

    #[test]
    fn test_blank_line_and_k_only_skip() {
        assert!(is_skip("\n"));
        assert!(is_skip(" K "));
        assert!(!is_skip("1"));
        assert!(!is_skip("s"));
    }

    #[test]
    fn test_describe_event_uses_attribute_label() {
        let note = describe_event(
            &event(SessionEventKind::AttributeChanged(AttributeChanged {
                key: "courage".to_owned(),
                previous: 50,
                current: 70,
                delta: 20,
            })),
            &sample_story(),
        );

        assert_eq!(note.as_deref(), Some("Courage +20 (now 70)"));
    }

    #[test]
    fn test_describe_event_names_unlocked_region() {
        let note = describe_event(
            &event(SessionEventKind::RegionUnlocked(RegionUnlocked {
                region: "kedah".to_owned(),
                name: Some("Kedah".to_owned()),
            })),
            &regions_story(),
        );

        assert_eq!(note.as_deref(), Some("Region opened: Kedah"));
    }

    #[test]
    fn test_describe_event_is_silent_for_scene_entries() {
        let note = describe_event(&event(SessionEventKind::SessionRestarted), &sample_story());

        assert!(note.is_none());
    }
}
