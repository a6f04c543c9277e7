//! Test advisor — a scripted `Advisor` implementation for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use storyloom_advisor::{AdviceError, Advisor};

/// An advisor that answers from a queue of scripted responses and records
/// every prompt it receives. Once the script is exhausted it fails with a
/// network error.
#[derive(Debug, Default)]
pub struct ScriptedAdvisor {
    responses: Mutex<VecDeque<Result<String, AdviceError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedAdvisor {
    /// Create an advisor that returns `responses` in order.
    #[must_use]
    pub fn new(responses: Vec<Result<String, AdviceError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create an advisor with a single successful answer.
    #[must_use]
    pub fn answering(text: &str) -> Self {
        Self::new(vec![Ok(text.to_owned())])
    }

    /// Returns a snapshot of all prompts received.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Advisor for ScriptedAdvisor {
    async fn request_guidance(&self, prompt: &str) -> Result<String, AdviceError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AdviceError::Network("no scripted response".into())))
    }
}
