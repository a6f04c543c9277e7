//! Process configuration read from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use storyloom_advisor::gemini::DEFAULT_MODEL;

use crate::error::AppError;

/// Save directory used when `SAVE_DIR` is unset.
pub const DEFAULT_SAVE_DIR: &str = ".storyloom";

/// Model used when `GEMINI_MODEL` is unset.
pub const DEFAULT_GEMINI_MODEL: &str = DEFAULT_MODEL;

/// Typewriter delay per character, in milliseconds, when `TYPEWRITER_MS` is
/// unset.
pub const DEFAULT_TYPEWRITER_MS: u64 = 25;

/// Settings for one run of the terminal host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Story document to play (`STORY_PATH`).
    pub story_path: PathBuf,
    /// Directory holding save slots (`SAVE_DIR`).
    pub save_dir: PathBuf,
    /// Advice is disabled when this is `None` (`GEMINI_API_KEY`).
    pub gemini_api_key: Option<String>,
    /// `GEMINI_MODEL`.
    pub gemini_model: String,
    /// Delay between revealed characters; zero reveals instantly
    /// (`TYPEWRITER_MS`).
    pub typewriter_delay: Duration,
}

impl CliConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`CliConfig::from_lookup`].
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// the named variable if it is set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `STORY_PATH` is missing or
    /// `TYPEWRITER_MS` is not a non-negative integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let story_path = non_empty("STORY_PATH")
            .map(PathBuf::from)
            .ok_or_else(|| AppError::Config("STORY_PATH environment variable must be set".into()))?;
        let save_dir = non_empty("SAVE_DIR").map_or_else(|| PathBuf::from(DEFAULT_SAVE_DIR), PathBuf::from);
        let gemini_api_key = non_empty("GEMINI_API_KEY");
        let gemini_model =
            non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_owned());
        let typewriter_ms = match non_empty("TYPEWRITER_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| AppError::Config(format!("TYPEWRITER_MS must be a valid u64: {e}")))?,
            None => DEFAULT_TYPEWRITER_MS,
        };

        Ok(Self {
            story_path,
            save_dir,
            gemini_api_key,
            gemini_model,
            typewriter_delay: Duration::from_millis(typewriter_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_applies_defaults() {
        let config = CliConfig::from_lookup(lookup(&[("STORY_PATH", "stories/forest.yaml")])).unwrap();

        assert_eq!(config.story_path, PathBuf::from("stories/forest.yaml"));
        assert_eq!(config.save_dir, PathBuf::from(".storyloom"));
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.typewriter_delay, Duration::from_millis(25));
    }

    #[test]
    fn test_from_lookup_reads_every_variable() {
        let config = CliConfig::from_lookup(lookup(&[
            ("STORY_PATH", "story.json"),
            ("SAVE_DIR", "/tmp/saves"),
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-pro"),
            ("TYPEWRITER_MS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.save_dir, PathBuf::from("/tmp/saves"));
        assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
        assert_eq!(config.gemini_model, "gemini-pro");
        assert_eq!(config.typewriter_delay, Duration::ZERO);
    }

    #[test]
    fn test_from_lookup_requires_story_path() {
        let result = CliConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "secret")]));

        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("STORY_PATH")));
    }

    #[test]
    fn test_from_lookup_treats_blank_api_key_as_unset() {
        let config =
            CliConfig::from_lookup(lookup(&[("STORY_PATH", "s.yaml"), ("GEMINI_API_KEY", "  ")]))
                .unwrap();

        assert_eq!(config.gemini_api_key, None);
    }

    #[test]
    fn test_from_lookup_rejects_invalid_typewriter_delay() {
        let result =
            CliConfig::from_lookup(lookup(&[("STORY_PATH", "s.yaml"), ("TYPEWRITER_MS", "fast")]));

        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("TYPEWRITER_MS")));
    }
}
