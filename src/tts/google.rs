//! Google Translate `translate_tts` backend.
//!
//! The endpoint accepts at most [`MAX_CHUNK_CHARS`] characters per request
//! and answers with an MP3 stream.  Longer texts are split at whitespace and
//! the MP3 streams are concatenated, which players handle as one file since
//! MPEG frames are self-delimiting.

use async_trait::async_trait;

use crate::audio::AudioClip;
use crate::config::TtsConfig;
use crate::language::LanguageCode;
use crate::tts::synthesizer::{SpeechBackend, SynthesisError};

pub const MAX_CHUNK_CHARS: usize = 100;

pub struct GoogleTts {
    client: reqwest::Client,
    base_url: String,
    slow: bool,
}

impl GoogleTts {
    pub fn from_config(config: &TtsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            slow: config.slow,
        }
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        index: usize,
        total: usize,
        language: LanguageCode,
    ) -> Result<Vec<u8>, SynthesisError> {
        let url = format!("{}/translate_tts", self.base_url);
        let speed = if self.slow { "0.24" } else { "1" };
        let (idx, total, len) = (
            index.to_string(),
            total.to_string(),
            chunk.chars().count().to_string(),
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language.as_str()),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", len.as_str()),
                ("ttsspeed", speed),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST || status == reqwest::StatusCode::NOT_FOUND {
            return Err(SynthesisError::UnsupportedLanguage(language));
        }
        if !status.is_success() {
            return Err(SynthesisError::ServiceUnavailable(format!("HTTP {status}")));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl SpeechBackend for GoogleTts {
    async fn synthesize(
        &self,
        text: &str,
        language: LanguageCode,
    ) -> Result<AudioClip, SynthesisError> {
        let chunks = split_at_whitespace(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SynthesisError::EmptyInput);
        }

        let mut audio = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(chunk, i, chunks.len(), language).await?);
        }
        if audio.is_empty() {
            return Err(SynthesisError::ServiceUnavailable("empty audio stream".into()));
        }

        log::debug!(
            "tts: {} chunk(s), {} bytes of MP3 in {language}",
            chunks.len(),
            audio.len()
        );
        Ok(AudioClip::mp3(audio))
    }
}

/// Pack words into chunks of at most `max` characters.  A single word longer
/// than `max` is cut into `max`-character pieces.
fn split_at_whitespace(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            chunks.extend(chars.chunks(max).map(|c| c.iter().collect::<String>()));
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_at_whitespace("sow wheat now", 100), vec!["sow wheat now"]);
    }

    #[test]
    fn chunks_respect_limit_and_keep_words_whole() {
        let text = "गेहूं की बुवाई ".repeat(20);
        let chunks = split_at_whitespace(&text, MAX_CHUNK_CHARS);
        assert!(chunks.len() > 1);
        for c in &chunks {
            assert!(c.chars().count() <= MAX_CHUNK_CHARS, "{c}");
            assert!(!c.starts_with(' ') && !c.ends_with(' '));
        }
        let rejoined = chunks.join(" ");
        assert_eq!(rejoined, text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn oversized_word_is_cut() {
        let word = "x".repeat(250);
        let chunks = split_at_whitespace(&format!("a {word} b"), 100);
        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks[0], "a");
        assert_eq!(chunks[1].len(), 100);
        assert_eq!(chunks[3].len(), 50);
        assert_eq!(chunks[4], "b");
    }

    #[test]
    fn exact_fit_is_not_split() {
        let text = format!("{} {}", "a".repeat(49), "b".repeat(50));
        assert_eq!(split_at_whitespace(&text, 100).len(), 1);
    }

    #[test]
    fn blank_text_has_no_chunks() {
        assert!(split_at_whitespace("   ", 100).is_empty());
    }
}
