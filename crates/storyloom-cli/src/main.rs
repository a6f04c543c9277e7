//! Storyloom terminal player entry point.

use std::error::Error;
use std::sync::Arc;

use storyloom_advisor::{Advisor, DisabledAdvisor, GeminiAdvisor};
use storyloom_cli::config::CliConfig;
use storyloom_cli::terminal::Terminal;
use storyloom_core::clock::SystemClock;
use storyloom_save_store::file_save_store::FileSaveStore;
use storyloom_session::application::controller::GameSession;
use storyloom_story::application::loader::load_story;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr so they never interleave with the story on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = CliConfig::from_env()?;
    tracing::info!(story = %config.story_path.display(), "starting Storyloom");

    let story = load_story(&config.story_path)?;
    let store = FileSaveStore::new(&config.save_dir);
    let advisor: Box<dyn Advisor> = match &config.gemini_api_key {
        Some(key) => Box::new(GeminiAdvisor::new(key.clone()).with_model(&config.gemini_model)),
        None => Box::new(DisabledAdvisor::new("GEMINI_API_KEY is not set")),
    };

    let session = GameSession::new(Arc::new(story), Arc::new(SystemClock));
    let mut terminal = Terminal::new(
        session,
        &store,
        advisor.as_ref(),
        tokio::io::BufReader::new(tokio::io::stdin()),
        std::io::stdout().lock(),
        config.typewriter_delay,
    );
    terminal.run().await?;

    Ok(())
}
