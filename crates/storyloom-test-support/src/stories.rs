//! Story fixtures.

use storyloom_story::application::loader::{StoryFormat, parse_story};
use storyloom_story::domain::story::StoryConfig;

/// A small forest story: two bounded attributes, a hint scene, a custom
/// action scene, a dead end, and one dangling choice target.
pub const SAMPLE_STORY_YAML: &str = include_str!("../../../stories/forest-tale.yaml");

/// A regional story: signed attributes, an aggregate score, and travel
/// between unlockable regions.
pub const REGIONS_STORY_YAML: &str = include_str!("../../../stories/tanah-melayu.yaml");

/// Compiled [`SAMPLE_STORY_YAML`].
///
/// # Panics
///
/// Panics if the fixture fails to compile.
#[must_use]
pub fn sample_story() -> StoryConfig {
    parse_story(SAMPLE_STORY_YAML, StoryFormat::Yaml).expect("sample story fixture compiles")
}

/// Compiled [`REGIONS_STORY_YAML`].
///
/// # Panics
///
/// Panics if the fixture fails to compile.
#[must_use]
pub fn regions_story() -> StoryConfig {
    parse_story(REGIONS_STORY_YAML, StoryFormat::Yaml).expect("regions story fixture compiles")
}
