//! Gemini `generateContent` client.
//!
//! One POST per request: a single user prompt in, the first candidate's
//! first text part out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::advisor::Advisor;
use crate::error::AdviceError;

/// Public API base URL.
const API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Model used unless overridden.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Advisor backed by the Gemini generative language API.
#[derive(Debug, Clone)]
pub struct GeminiAdvisor {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiAdvisor {
    /// Create a new client for the default model.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_owned(),
            base_url: API_BASE.to_owned(),
        }
    }

    /// Set the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different host (proxies, local fakes).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl Advisor for GeminiAdvisor {
    async fn request_guidance(&self, prompt: &str) -> Result<String, AdviceError> {
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "requesting guidance");
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(|e| AdviceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %body, "advice request rejected");
            return Err(AdviceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AdviceError::UnexpectedResponseShape(e.to_string()))?;

        parsed.into_text()
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_owned()),
                parts: vec![Part {
                    text: Some(prompt.to_owned()),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, AdviceError> {
        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text);

        match text {
            Some(text) => Ok(text),
            None => match self.prompt_feedback.and_then(|f| f.block_reason) {
                Some(reason) => Err(AdviceError::Blocked(reason)),
                None => Err(AdviceError::UnexpectedResponseShape(
                    "no candidate text in response".to_owned(),
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> Result<String, AdviceError> {
        serde_json::from_value::<GenerateContentResponse>(json)
            .unwrap()
            .into_text()
    }

    #[test]
    fn test_request_body_nests_prompt_under_contents() {
        let body = serde_json::to_value(GenerateContentRequest::from_prompt("hello")).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }]
            })
        );
    }

    #[test]
    fn test_into_text_returns_first_candidate_part() {
        let result = parse(serde_json::json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "Be brave." }, { "text": "ignored" }] } },
                { "content": { "parts": [{ "text": "second" }] } }
            ]
        }));

        assert_eq!(result.unwrap(), "Be brave.");
    }

    #[test]
    fn test_into_text_reports_block_reason() {
        let result = parse(serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }));

        match result {
            Err(AdviceError::Blocked(reason)) => assert_eq!(reason, "SAFETY"),
            other => panic!("expected Blocked, got {other:?}"),
        }
    }

    #[test]
    fn test_into_text_reports_unexpected_shape_for_empty_parts() {
        let result = parse(serde_json::json!({
            "candidates": [{ "content": { "parts": [] } }]
        }));

        assert!(matches!(
            result,
            Err(AdviceError::UnexpectedResponseShape(_))
        ));
    }

    #[test]
    fn test_endpoint_includes_model_and_trims_base() {
        let advisor = GeminiAdvisor::new("k")
            .with_base_url("http://localhost:9999/")
            .with_model("gemini-test");

        assert_eq!(
            advisor.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent"
        );
    }

    #[tokio::test]
    async fn test_request_guidance_reports_network_error_when_unreachable() {
        // Port 9 (discard) on localhost is not served by an HTTP listener.
        let advisor = GeminiAdvisor::new("k").with_base_url("http://127.0.0.1:9");

        let result = advisor.request_guidance("hi").await;

        assert!(result.unwrap_err().is_network());
    }
}
