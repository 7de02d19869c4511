//! Google Translate `translate_a/single` client.
//!
//! The endpoint answers with a nested JSON array whose first element lists
//! the translated segments: `[[["segment", "source", ...], ...], ...]`.
//! Segments are concatenated in order.  Long texts are split at line
//! boundaries so no single request exceeds [`MAX_REQUEST_CHARS`].

use async_trait::async_trait;
use serde_json::Value;

use crate::config::TranslateConfig;
use crate::language::LanguageCode;
use crate::translate::provider::{TranslationError, TranslationProvider};

/// Upper bound on characters per request.
pub const MAX_REQUEST_CHARS: usize = 4500;

pub struct GoogleTranslate {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslate {
    pub fn from_config(config: &TranslateConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn translate_chunk(
        &self,
        chunk: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<String, TranslationError> {
        let url = format!("{}/translate_a/single", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", from.as_str()),
                ("tl", to.as_str()),
                ("dt", "t"),
                ("q", chunk),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST {
            return Err(TranslationError::UnsupportedPair { from, to });
        }
        if !status.is_success() {
            return Err(TranslationError::ServiceUnavailable(format!("HTTP {status}")));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| TranslationError::ServiceUnavailable(e.to_string()))?;

        join_segments(&json).ok_or_else(|| {
            TranslationError::ServiceUnavailable("response carried no translation".into())
        })
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslate {
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<String, TranslationError> {
        let mut out = String::with_capacity(text.len());
        for chunk in split_lines(text, MAX_REQUEST_CHARS) {
            if chunk.trim().is_empty() {
                out.push_str(&chunk);
                continue;
            }
            out.push_str(&self.translate_chunk(&chunk, from, to).await?);
        }
        log::debug!(
            "translate: {from}→{to} {} → {} chars",
            text.chars().count(),
            out.chars().count()
        );
        Ok(out)
    }
}

/// Concatenate `json[0][i][0]` for every segment `i`.
fn join_segments(json: &Value) -> Option<String> {
    let segments = json.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(Value::as_str))
        .collect();
    (!text.trim().is_empty()).then_some(text)
}

/// Group whole lines (newlines kept) into chunks of at most `max` chars.
/// A single line longer than `max` becomes its own chunk.
fn split_lines(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let len = line.chars().count();
        if current_len > 0 && current_len + len > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(line);
        current_len += len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
