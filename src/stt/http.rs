//! `HttpTranscriber`: OpenAI-compatible `/v1/audio/transcriptions` client.
//!
//! Works with any server that speaks the Whisper transcription wire format
//! (OpenAI, Groq, faster-whisper-server, LocalAI, ...).  Clips are validated
//! locally with [`ClipValidator`] first, so empty or truncated recordings
//! never cost a network round-trip.

use async_trait::async_trait;
use serde::Deserialize;

use crate::audio::{AudioClip, ClipValidator};
use crate::config::SttConfig;
use crate::language::LanguageCode;
use crate::stt::engine::{check_transcript, SpeechTranscriber, TranscriptionError};

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

pub struct HttpTranscriber {
    client: reqwest::Client,
    config: SttConfig,
    validator: ClipValidator,
}

impl HttpTranscriber {
    /// Build a transcriber from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.
    pub fn from_config(config: &SttConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            validator: ClipValidator::new(config.min_audio_bytes),
            config: config.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/audio/transcriptions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl SpeechTranscriber for HttpTranscriber {
    async fn transcribe(
        &self,
        clip: &AudioClip,
        language: LanguageCode,
    ) -> Result<String, TranscriptionError> {
        let info = self.validator.validate(clip)?;
        log::debug!(
            "stt: uploading {} bytes ({:?} s) language={}",
            clip.len(),
            info.duration_secs,
            language
        );

        let part = reqwest::multipart::Part::bytes(clip.bytes.clone())
            .file_name(format!("audio.{}", clip.encoding.extension()))
            .mime_str(clip.encoding.mime_type())
            .map_err(|e| TranscriptionError::Malformed(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.config.model.clone())
            .text("language", language.as_str().to_string())
            .text("response_format", "json");

        let mut req = self.client.post(self.endpoint()).multipart(form);
        if let Some(key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("stt: service returned {status}: {body}");
            return Err(status_error(status, &body));
        }

        let result: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::ServiceUnavailable(e.to_string()))?;

        let text = check_transcript(&result.text)?;
        log::info!("stt: transcribed {} chars", text.chars().count());
        Ok(text)
    }
}

/// Only statuses that blame the upload itself count as malformed audio;
/// auth, quota and server failures are the service's.
fn status_error(status: reqwest::StatusCode, body: &str) -> TranscriptionError {
    match status.as_u16() {
        400 | 413 | 415 | 422 => TranscriptionError::Malformed(format!("HTTP {status}: {body}")),
        _ => TranscriptionError::ServiceUnavailable(format!("HTTP {status}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> SttConfig {
        SttConfig {
            base_url: base_url.into(),
            ..SttConfig::default()
        }
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let stt = HttpTranscriber::from_config(&config("http://localhost:8000/"));
        assert_eq!(
            stt.endpoint(),
            "http://localhost:8000/v1/audio/transcriptions"
        );
    }

    #[test]
    fn auth_and_quota_statuses_are_service_failures() {
        use reqwest::StatusCode;

        for status in [
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::BAD_GATEWAY,
        ] {
            let err = status_error(status, "");
            assert!(
                matches!(err, TranscriptionError::ServiceUnavailable(_)),
                "{status} -> {err:?}"
            );
            assert_eq!(err.class(), crate::error::ErrorClass::Service);
        }
        for status in [StatusCode::BAD_REQUEST, StatusCode::UNSUPPORTED_MEDIA_TYPE] {
            let err = status_error(status, "bad file");
            assert!(matches!(err, TranscriptionError::Malformed(_)), "{status}");
            assert_eq!(err.class(), crate::error::ErrorClass::Input);
        }
    }

    #[tokio::test]
    async fn empty_clip_fails_before_network() {
        // Port 9 (discard) is never contacted: validation fails first.
        let stt = HttpTranscriber::from_config(&config("http://127.0.0.1:9"));
        let err = stt
            .transcribe(&AudioClip::wav(Vec::new()), LanguageCode::Hi)
            .await
            .unwrap_err();
        assert!(matches!(err, TranscriptionError::Empty(_)));
    }

    #[tokio::test]
    async fn short_wav_fails_before_network() {
        let stt = HttpTranscriber::from_config(&config("http://127.0.0.1:9"));
        let clip = AudioClip::from_pcm16(&[0; 100], 16_000).unwrap();
        let err = stt.transcribe(&clip, LanguageCode::Hi).await.unwrap_err();
        assert!(matches!(err, TranscriptionError::Empty(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_service_unavailable() {
        let stt = HttpTranscriber::from_config(&SttConfig {
            base_url: "http://127.0.0.1:1".into(),
            timeout_secs: 2,
            ..SttConfig::default()
        });
        let clip = AudioClip::from_pcm16(&vec![0; 16_000], 16_000).unwrap();
        let err = stt.transcribe(&clip, LanguageCode::En).await.unwrap_err();
        assert!(matches!(err, TranscriptionError::ServiceUnavailable(_)));
    }
}
