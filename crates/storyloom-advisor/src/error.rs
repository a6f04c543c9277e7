//! Advice request errors.

use thiserror::Error;

/// Failure of a guidance request. Always recoverable: callers show
/// [`crate::prompt::PromptEngine::render_fallback`] text instead.
#[derive(Debug, Error)]
pub enum AdviceError {
    /// The advisor is not configured (e.g. no API key).
    #[error("advisor not configured: {0}")]
    Configuration(String),

    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("API call failed with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for logs.
        body: String,
    },

    /// The service refused the prompt.
    #[error("request blocked: {0}")]
    Blocked(String),

    /// The response body did not carry generated text where expected.
    #[error("unexpected response shape: {0}")]
    UnexpectedResponseShape(String),

    /// The prompt could not be built, so nothing was sent.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// A prompt template that is missing, failed to compile, or failed to render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("prompt template error: {0}")]
pub struct TemplateError(pub String);

impl AdviceError {
    /// Returns `true` for transport-level failures.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
