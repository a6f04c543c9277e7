//! Storyloom — External Advice Collaborator.
//!
//! Turns a guidance request into a prompt, sends it to a generative text
//! service, and hands back either the generated text or an error the caller
//! converts into a user-displayable fallback. Never touches session state.

pub mod advisor;
pub mod error;
pub mod gemini;
pub mod prompt;

pub use advisor::{Advisor, DisabledAdvisor};
pub use error::{AdviceError, TemplateError};
pub use gemini::GeminiAdvisor;
pub use prompt::{GuidanceContext, GuidanceKind, PromptEngine};
