//! Story document loading.
//!
//! Stories are authored as YAML or JSON and compiled once at startup.

use std::path::Path;

use storyloom_core::error::DomainError;

use crate::domain::document::StoryDocument;
use crate::domain::story::StoryConfig;

/// Serialization format of a story document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryFormat {
    Yaml,
    Json,
}

impl StoryFormat {
    /// Picks the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for any extension other than
    /// `yaml`, `yml` or `json`.
    pub fn from_path(path: &Path) -> Result<Self, DomainError> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(DomainError::Validation(format!(
                "unsupported story file extension: {}",
                path.display()
            ))),
        }
    }
}

/// Parses and compiles a story document held in memory.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the source does not parse or the
/// compiled story is invalid.
pub fn parse_story(source: &str, format: StoryFormat) -> Result<StoryConfig, DomainError> {
    let document: StoryDocument = match format {
        StoryFormat::Yaml => serde_yaml::from_str(source)
            .map_err(|e| DomainError::Validation(format!("story YAML is malformed: {e}")))?,
        StoryFormat::Json => serde_json::from_str(source)
            .map_err(|e| DomainError::Validation(format!("story JSON is malformed: {e}")))?,
    };
    StoryConfig::compile(document)
}

/// Reads, parses and compiles a story file.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the file cannot be read, and
/// `DomainError::Validation` if it cannot be parsed or compiled.
pub fn load_story(path: &Path) -> Result<StoryConfig, DomainError> {
    let format = StoryFormat::from_path(path)?;
    let source = std::fs::read_to_string(path).map_err(|e| {
        DomainError::Infrastructure(format!("cannot read story {}: {e}", path.display()))
    })?;
    let config = parse_story(&source, format)?;
    tracing::info!(
        game_id = config.game_id(),
        scenes = config.scenes().count(),
        path = %path.display(),
        "story loaded"
    );
    Ok(config)
}
