//! Choice actions.
//!
//! Story documents encode a choice's effect as a bare string that is either a
//! reserved verb or the identifier of the next scene. The string is resolved
//! into an [`Action`] once, when the document is deserialized.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved verb that replaces the session with a fresh one.
pub const RESTART_VERB: &str = "restart";

/// Reserved verb that asks the mentor for general advice.
pub const ADVICE_VERB: &str = "learn_from_ai";

/// Prefix of travel directives; the remainder names the destination region.
pub const TRAVEL_PREFIX: &str = "travel_";

/// What selecting a choice does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    /// Discard the session and start over.
    Restart,
    /// Request mentor guidance without leaving the scene.
    RequestAdvice,
    /// Travel to a region. The next scene is `travel_<region>`.
    Travel(String),
    /// Move to the named scene.
    GoTo(String),
}

impl Action {
    /// Resolves a raw action string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            RESTART_VERB => Self::Restart,
            ADVICE_VERB => Self::RequestAdvice,
            _ => match raw.strip_prefix(TRAVEL_PREFIX) {
                Some(region) if !region.is_empty() => Self::Travel(region.to_owned()),
                _ => Self::GoTo(raw.to_owned()),
            },
        }
    }

    /// The scene this action leads to, if it leads anywhere.
    #[must_use]
    pub fn target_scene(&self) -> Option<String> {
        match self {
            Self::GoTo(scene) => Some(scene.clone()),
            Self::Travel(region) => Some(format!("{TRAVEL_PREFIX}{region}")),
            Self::Restart | Self::RequestAdvice => None,
        }
    }
}

impl From<String> for Action {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.to_string()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Restart => f.write_str(RESTART_VERB),
            Self::RequestAdvice => f.write_str(ADVICE_VERB),
            Self::Travel(region) => write!(f, "{TRAVEL_PREFIX}{region}"),
            Self::GoTo(scene) => f.write_str(scene),
        }
    }
}
