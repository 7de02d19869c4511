//! Core `LanguageModel` trait and `GeminiModel` implementation.
//!
//! `GeminiModel` calls the Generative Language API
//! (`/v1beta/models/{model}:generateContent`).  Connection details and
//! sampling parameters come from [`LlmConfig`]; the key is resolved by the
//! caller (see [`LlmConfig::resolve_api_key`]).

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::LlmConfig;
use crate::error::ErrorClass;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur while generating an answer.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LlmError {
    /// HTTP transport, connection or non-success status.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("LLM request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse LLM response: {0}")]
    Parse(String),

    /// The model refused the prompt.
    #[error("prompt blocked by the model: {0}")]
    Blocked(String),

    /// The model returned a response with no usable text content.
    #[error("LLM returned an empty response")]
    EmptyResponse,

    /// The API key was rejected.
    #[error("API key rejected: {0}")]
    Unauthorized(String),
}

impl LlmError {
    pub fn class(&self) -> ErrorClass {
        match self {
            LlmError::Unauthorized(_) => ErrorClass::Configuration,
            _ => ErrorClass::Service,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// LanguageModel trait
// ---------------------------------------------------------------------------

/// Async trait for hosted text-generation models.
///
/// Implementors must be `Send + Sync` so they can be shared behind
/// `Arc<dyn LanguageModel>`.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// GeminiModel
// ---------------------------------------------------------------------------

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

pub struct GeminiModel {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: String,
}

impl GeminiModel {
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            api_key: api_key.into(),
        }
    }

    fn request_body(&self, prompt: &str) -> Value {
        let safety: Vec<Value> = SAFETY_CATEGORIES
            .iter()
            .map(|c| serde_json::json!({ "category": c, "threshold": "BLOCK_MEDIUM_AND_ABOVE" }))
            .collect();

        serde_json::json!({
            "contents": [
                { "role": "user", "parts": [ { "text": prompt } ] }
            ],
            "generationConfig": {
                "temperature":     self.config.temperature,
                "topP":            self.config.top_p,
                "topK":            self.config.top_k,
                "maxOutputTokens": self.config.max_output_tokens,
                "responseMimeType": "text/plain"
            },
            "safetySettings": safety
        })
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("llm: {} returned {status}", self.config.model);
            return Err(status_error(status, &body));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        extract_text(&json)
    }
}

/// Map a failure status to an error.  A bad key comes back as 401/403, or as
/// 400 with `API_KEY_INVALID` in the body.
fn status_error(status: reqwest::StatusCode, body: &str) -> LlmError {
    let bad_key = matches!(status.as_u16(), 401 | 403)
        || (status.as_u16() == 400 && body.contains("API_KEY_INVALID"));
    if bad_key {
        LlmError::Unauthorized(format!("HTTP {status}"))
    } else {
        LlmError::Request(format!("HTTP {status}: {body}"))
    }
}

/// Pull the answer out of a `generateContent` response.
///
/// All text parts of the first candidate are concatenated.
fn extract_text(json: &Value) -> Result<String, LlmError> {
    if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
        return Err(LlmError::Blocked(reason.to_string()));
    }

    let parts = json["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or(LlmError::EmptyResponse)?;

    let text: String = parts
        .iter()
        .filter_map(|p| p["text"].as_str())
        .collect::<Vec<_>>()
        .join("");
    let text = text.trim();

    if text.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text.to_string())
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use mock::MockModel;


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_first_candidate_text() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [ { "text": "Sow wheat " }, { "text": "in November." } ] }
            }]
        });
        assert_eq!(extract_text(&body).unwrap(), "Sow wheat in November.");
    }

    #[test]
    fn missing_candidates_is_empty_response() {
        assert_eq!(extract_text(&json!({})), Err(LlmError::EmptyResponse));
        let blank = json!({ "candidates": [{ "content": { "parts": [ { "text": "  " } ] } }] });
        assert_eq!(extract_text(&blank), Err(LlmError::EmptyResponse));
    }

    #[test]
    fn block_reason_is_reported() {
        let body = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert_eq!(extract_text(&body), Err(LlmError::Blocked("SAFETY".into())));
    }

    #[test]
    fn request_body_carries_generation_config() {
        let model = GeminiModel::new(&LlmConfig::default(), "k");
        let body = model.request_body("when to sow wheat?");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "when to sow wheat?");
        assert_eq!(body["generationConfig"]["topK"], 64);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 8192);
        assert_eq!(body["safetySettings"].as_array().map(Vec::len), Some(4));
    }

    #[test]
    fn only_rejected_key_is_configuration_class() {
        assert_eq!(LlmError::Timeout.class(), ErrorClass::Service);
        assert_eq!(LlmError::EmptyResponse.class(), ErrorClass::Service);
        assert_eq!(
            LlmError::Unauthorized("HTTP 403".into()).class(),
            ErrorClass::Configuration
        );
    }

    #[test]
    fn rejected_key_statuses() {
        use reqwest::StatusCode;

        let invalid = r#"{"error":{"status":"INVALID_ARGUMENT","details":[{"reason":"API_KEY_INVALID"}]}}"#;
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, invalid),
            LlmError::Unauthorized(_)
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, ""),
            LlmError::Unauthorized(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, "bad prompt"),
            LlmError::Request(_)
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "quota"),
            LlmError::Request(_)
        ));
    }

    #[test]
    fn gemini_is_object_safe() {
        let _: Box<dyn LanguageModel> = Box::new(GeminiModel::new(&LlmConfig::default(), "k"));
    }
}
