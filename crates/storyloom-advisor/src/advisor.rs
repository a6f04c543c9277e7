//! Advisor abstraction.

use async_trait::async_trait;

use crate::error::AdviceError;

/// Generates guidance text for a fully assembled prompt.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Sends `prompt` and returns the generated text.
    async fn request_guidance(&self, prompt: &str) -> Result<String, AdviceError>;
}

/// Advisor used when no generative service is configured. Every request
/// fails with `AdviceError::Configuration`, which callers turn into the
/// story's fallback message.
#[derive(Debug, Clone)]
pub struct DisabledAdvisor {
    reason: String,
}

impl DisabledAdvisor {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Advisor for DisabledAdvisor {
    async fn request_guidance(&self, _prompt: &str) -> Result<String, AdviceError> {
        Err(AdviceError::Configuration(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_advisor_reports_configuration_error() {
        let advisor = DisabledAdvisor::new("GEMINI_API_KEY not set");

        let result = advisor.request_guidance("anything").await;

        match result {
            Err(AdviceError::Configuration(reason)) => {
                assert_eq!(reason, "GEMINI_API_KEY not set");
            }
            other => panic!("expected Configuration, got {other:?}"),
        }
    }
}
