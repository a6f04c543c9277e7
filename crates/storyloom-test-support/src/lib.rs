//! Shared test mocks and fixtures for the Storyloom engine.

mod advisor;
mod clock;
mod store;
mod stories;

pub use advisor::ScriptedAdvisor;
pub use clock::FixedClock;
pub use store::{EmptySaveStore, FailingSaveStore, InMemorySaveStore};
pub use stories::{REGIONS_STORY_YAML, SAMPLE_STORY_YAML, regions_story, sample_story};
