//! Core speech-recognition trait and error type.
//!
//! # Overview
//!
//! [`SpeechTranscriber`] is the public interface used by the pipeline.  It is
//! object-safe and `Send + Sync` so it can be held behind an
//! `Arc<dyn SpeechTranscriber>`.
//!
//! [`HttpTranscriber`](crate::stt::HttpTranscriber) is the production
//! implementation.  [`MockTranscriber`] (available under `#[cfg(test)]`)
//! returns a pre-configured response and counts its calls, which lets the
//! pipeline tests assert that later stages were never reached.

use async_trait::async_trait;
use thiserror::Error;

use crate::audio::{AudioClip, ClipError};
use crate::error::ErrorClass;
use crate::language::LanguageCode;

/// Transcripts shorter than this (in characters) are treated as noise.
pub const MIN_TRANSCRIPT_CHARS: usize = 2;

// ---------------------------------------------------------------------------
// TranscriptionError
// ---------------------------------------------------------------------------

/// All errors that can arise from speech recognition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TranscriptionError {
    /// No usable audio: zero bytes, or too little payload to hold speech.
    #[error("{0}")]
    Empty(String),

    /// The service heard nothing it could turn into words.
    #[error("No clear speech detected")]
    Unintelligible,

    /// Network failure, timeout or server-side error.
    #[error("speech recognition service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The audio could not be decoded, locally or by the service.
    #[error("audio could not be processed: {0}")]
    Malformed(String),
}

impl TranscriptionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            TranscriptionError::ServiceUnavailable(_) => ErrorClass::Service,
            _ => ErrorClass::Input,
        }
    }
}

impl From<ClipError> for TranscriptionError {
    fn from(e: ClipError) -> Self {
        match e {
            ClipError::Empty => TranscriptionError::Empty(e.to_string()),
            ClipError::TooShort { .. } => TranscriptionError::Empty(e.to_string()),
            ClipError::Malformed(msg) => TranscriptionError::Malformed(msg),
        }
    }
}

impl From<reqwest::Error> for TranscriptionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranscriptionError::ServiceUnavailable("request timed out".into())
        } else {
            TranscriptionError::ServiceUnavailable(e.to_string())
        }
    }
}

/// Trim a raw service transcript and reject results too short to be speech.
pub fn check_transcript(raw: &str) -> Result<String, TranscriptionError> {
    let text = raw.trim();
    if text.chars().count() < MIN_TRANSCRIPT_CHARS {
        return Err(TranscriptionError::Unintelligible);
    }
    Ok(text.to_string())
}

// ---------------------------------------------------------------------------
// SpeechTranscriber trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for speech recognition.
///
/// # Contract
///
/// - Empty or too-short clips fail with [`TranscriptionError::Empty`]
///   before any network call.
/// - `language` is the recognition hint; the service may still return text
///   in another language.
/// - Never panics.
#[async_trait]
pub trait SpeechTranscriber: Send + Sync {
    async fn transcribe(
        &self,
        clip: &AudioClip,
        language: LanguageCode,
    ) -> Result<String, TranscriptionError>;
}

// ---------------------------------------------------------------------------
// MockTranscriber  (test-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use mock::MockTranscriber;

#[cfg(test)]
mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// A test double that returns a pre-configured response.
    ///
    /// Empty clips are rejected with [`TranscriptionError::Empty`] regardless
    /// of the configured response, mirroring the real contract.
    pub struct MockTranscriber {
        response: Result<String, TranscriptionError>,
        calls: AtomicUsize,
    }

    impl MockTranscriber {
        pub fn ok(text: impl Into<String>) -> Self {
            Self {
                response: Ok(text.into()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn err(error: TranscriptionError) -> Self {
            Self {
                response: Err(error),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SpeechTranscriber for MockTranscriber {
        async fn transcribe(
            &self,
            clip: &AudioClip,
            _language: LanguageCode,
        ) -> Result<String, TranscriptionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if clip.is_empty() {
                return Err(ClipError::Empty.into());
            }
            self.response.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_transcripts_are_unintelligible() {
        assert_eq!(check_transcript(""), Err(TranscriptionError::Unintelligible));
        assert_eq!(check_transcript("  a \n"), Err(TranscriptionError::Unintelligible));
        assert_eq!(check_transcript(" ok "), Ok("ok".to_string()));
    }

    #[test]
    fn devanagari_transcript_counts_characters_not_bytes() {
        // One Devanagari letter is three UTF-8 bytes.
        assert_eq!(check_transcript("क"), Err(TranscriptionError::Unintelligible));
        assert_eq!(check_transcript("गेहूं").unwrap(), "गेहूं");
    }

    #[test]
    fn unintelligible_message_is_user_facing() {
        assert_eq!(
            TranscriptionError::Unintelligible.to_string(),
            "No clear speech detected"
        );
    }

    #[test]
    fn clip_errors_map_to_input_class() {
        let e: TranscriptionError = ClipError::TooShort {
            got_bytes: 10,
            min_bytes: 1000,
        }
        .into();
        assert!(matches!(e, TranscriptionError::Empty(_)));
        assert_eq!(e.class(), ErrorClass::Input);

        let e: TranscriptionError = ClipError::Malformed("bad header".into()).into();
        assert_eq!(e, TranscriptionError::Malformed("bad header".into()));
    }

    #[test]
    fn service_errors_are_service_class() {
        let e = TranscriptionError::ServiceUnavailable("down".into());
        assert_eq!(e.class(), ErrorClass::Service);
    }

    #[tokio::test]
    async fn mock_rejects_empty_clip_and_counts_calls() {
        let stt = MockTranscriber::ok("hello");
        let err = stt
            .transcribe(&AudioClip::wav(Vec::new()), LanguageCode::En)
            .await
            .unwrap_err();
        assert!(matches!(err, TranscriptionError::Empty(_)));

        let text = stt
            .transcribe(&AudioClip::wav(vec![1; 10]), LanguageCode::En)
            .await
            .unwrap();
        assert_eq!(text, "hello");
        assert_eq!(stt.calls(), 2);
    }

    #[test]
    fn box_dyn_transcriber_compiles() {
        let _: Box<dyn SpeechTranscriber> = Box::new(MockTranscriber::ok("ok"));
    }
}
