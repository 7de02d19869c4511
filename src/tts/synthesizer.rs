//! `SpeechBackend` trait and the `SpeechSynthesizer` wrapper.
//!
//! The wrapper cleans text with [`sanitize`], then calls the backend.  A
//! backend that rejects the language gets one more attempt in the default
//! language before the error is returned.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::audio::AudioClip;
use crate::error::ErrorClass;
use crate::language::{LanguageCode, DEFAULT_LANGUAGE};
use crate::tts::sanitize::sanitize;

// ---------------------------------------------------------------------------
// SynthesisError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SynthesisError {
    /// Nothing speakable is left after cleaning.
    #[error("no speakable text")]
    EmptyInput,

    /// The backend has no voice for this language.
    #[error("speech synthesis does not support {0}")]
    UnsupportedLanguage(LanguageCode),

    /// Network failure, timeout or server error.
    #[error("speech synthesis service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl SynthesisError {
    pub fn class(&self) -> ErrorClass {
        match self {
            SynthesisError::EmptyInput => ErrorClass::Input,
            SynthesisError::UnsupportedLanguage(_) | SynthesisError::ServiceUnavailable(_) => {
                ErrorClass::Service
            }
        }
    }
}

impl From<reqwest::Error> for SynthesisError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SynthesisError::ServiceUnavailable("request timed out".into())
        } else {
            SynthesisError::ServiceUnavailable(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechBackend trait
// ---------------------------------------------------------------------------

/// A text-to-speech service.  Receives already-cleaned text.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        language: LanguageCode,
    ) -> Result<AudioClip, SynthesisError>;
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SpeechSynthesizer {
    backend: Arc<dyn SpeechBackend>,
}

impl SpeechSynthesizer {
    pub fn new(backend: Arc<dyn SpeechBackend>) -> Self {
        Self { backend }
    }

    pub async fn synthesize(
        &self,
        text: &str,
        language: LanguageCode,
    ) -> Result<AudioClip, SynthesisError> {
        let cleaned = sanitize(text).ok_or(SynthesisError::EmptyInput)?;

        match self.backend.synthesize(&cleaned, language).await {
            Err(SynthesisError::UnsupportedLanguage(lang)) if lang != DEFAULT_LANGUAGE => {
                log::warn!("tts: no voice for {lang}; retrying in {DEFAULT_LANGUAGE}");
                self.backend.synthesize(&cleaned, DEFAULT_LANGUAGE).await
            }
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// MockBackend  (test-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use mock::MockBackend;


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sends_cleaned_text() {
        let backend = Arc::new(MockBackend::working());
        let tts = SpeechSynthesizer::new(backend.clone());
        let clip = tts.synthesize("**गेहूं** 🌾 बोएं", LanguageCode::Hi).await.unwrap();
        assert_eq!(clip.encoding, crate::audio::AudioEncoding::Mp3);
        assert_eq!(backend.calls(), vec![("गेहूं बोएं".to_string(), LanguageCode::Hi)]);
    }

    #[tokio::test]
    async fn empty_after_cleaning_never_calls_backend() {
        let backend = Arc::new(MockBackend::working());
        let tts = SpeechSynthesizer::new(backend.clone());
        let err = tts.synthesize("** 🚜 **", LanguageCode::En).await.unwrap_err();
        assert_eq!(err, SynthesisError::EmptyInput);
        assert_eq!(err.class(), ErrorClass::Input);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn unsupported_language_retries_once_in_default() {
        let backend = Arc::new(MockBackend::without(&[LanguageCode::Ur]));
        let tts = SpeechSynthesizer::new(backend.clone());
        let clip = tts.synthesize("hello", LanguageCode::Ur).await.unwrap();
        assert!(!clip.is_empty());
        let langs: Vec<_> = backend.calls().into_iter().map(|(_, l)| l).collect();
        assert_eq!(langs, vec![LanguageCode::Ur, DEFAULT_LANGUAGE]);
    }

    #[tokio::test]
    async fn retry_failure_is_returned() {
        let backend = Arc::new(MockBackend::without(&[LanguageCode::Ur, LanguageCode::En]));
        let tts = SpeechSynthesizer::new(backend.clone());
        let err = tts.synthesize("hello", LanguageCode::Ur).await.unwrap_err();
        assert_eq!(err, SynthesisError::UnsupportedLanguage(LanguageCode::En));
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn service_outage_is_not_retried() {
        let backend = Arc::new(MockBackend::down());
        let tts = SpeechSynthesizer::new(backend.clone());
        let err = tts.synthesize("hello", LanguageCode::Hi).await.unwrap_err();
        assert!(matches!(err, SynthesisError::ServiceUnavailable(_)));
        assert_eq!(backend.calls().len(), 1);
    }
}
