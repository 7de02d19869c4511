//! `ConversationSession`: runs one question through every stage.
//!
//! ```text
//! TurnInput ─▶ text (typed, or transcribed)
//!           ─▶ duplicate? ──yes──▶ PipelineResult { duplicate }
//!           ─▶ detect language
//!           ─▶ translate → English          (error ends the turn)
//!           ─▶ AnswerGenerator              (never fails)
//!           ─▶ translate → response language (error: keep the answer)
//!           ─▶ synthesise                   (best-effort)
//!           ─▶ append turns, auto-play
//! ```
//!
//! Stages run strictly in sequence; `turn` takes `&mut self`, so a session
//! processes one question at a time.

use std::sync::Arc;

use thiserror::Error;

use crate::audio::{AudioClip, Playback, PlaybackError, TempFilePlayer};
use crate::config::{AppConfig, ResponseLanguage, SessionConfig};
use crate::error::ErrorClass;
use crate::language::{LanguageCode, LanguageDetector, DEFAULT_LANGUAGE};
use crate::llm::AnswerGenerator;
use crate::pipeline::history::{ConversationLog, Role, Turn};
use crate::pipeline::result::{PipelineResult, Stage};
use crate::stt::{HttpTranscriber, SpeechTranscriber};
use crate::translate::{GoogleTranslate, Translator, TRANSLATION_UNAVAILABLE};
use crate::tts::{GoogleTts, SpeechSynthesizer, SynthesisError};

// ---------------------------------------------------------------------------
// SessionOptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub use_ai: bool,
    pub auto_play: bool,
    pub synthesize: bool,
    pub response_language: ResponseLanguage,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for SessionOptions {
    fn from(config: &SessionConfig) -> Self {
        Self {
            use_ai: config.use_ai,
            auto_play: config.auto_play,
            synthesize: config.synthesize,
            response_language: config.response_language,
        }
    }
}

// ---------------------------------------------------------------------------
// TurnInput / SessionError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum TurnInput {
    Text(String),
    Audio(AudioClip),
}

/// Errors from the session's direct operations (`speak_turn`).  Turn
/// failures are reported inside [`PipelineResult`] instead.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no turn #{0} in the conversation")]
    NoSuchTurn(usize),

    #[error("turn #{0} is not an assistant answer")]
    NotAnAnswer(usize),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

impl SessionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            SessionError::NoSuchTurn(_) | SessionError::NotAnAnswer(_) => ErrorClass::Input,
            SessionError::Synthesis(e) => e.class(),
            SessionError::Playback(_) => ErrorClass::Service,
        }
    }
}

/// The last input that completed a turn.
struct LastInput {
    text: String,
    audio: Option<Vec<u8>>,
}

// ---------------------------------------------------------------------------
// ConversationSession
// ---------------------------------------------------------------------------

pub struct ConversationSession {
    detector: LanguageDetector,
    transcriber: Arc<dyn SpeechTranscriber>,
    translator: Translator,
    generator: AnswerGenerator,
    synthesizer: SpeechSynthesizer,
    playback: Box<dyn Playback>,
    options: SessionOptions,
    log: ConversationLog,
    last_input: Option<LastInput>,
}

impl ConversationSession {
    pub fn new(
        detector: LanguageDetector,
        transcriber: Arc<dyn SpeechTranscriber>,
        translator: Translator,
        generator: AnswerGenerator,
        synthesizer: SpeechSynthesizer,
        playback: Box<dyn Playback>,
        options: SessionOptions,
    ) -> Self {
        let session = Self {
            detector,
            transcriber,
            translator,
            generator: generator.with_ai(options.use_ai),
            synthesizer,
            playback,
            options,
            log: ConversationLog::new(),
            last_input: None,
        };
        if let Some(notice) = session.configuration_notice() {
            log::warn!("{notice}");
        }
        session
    }

    /// Wire the production services described by `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            LanguageDetector::new(),
            Arc::new(HttpTranscriber::from_config(&config.stt)),
            Translator::new(Arc::new(GoogleTranslate::from_config(&config.translate))),
            AnswerGenerator::from_config(&config.llm),
            SpeechSynthesizer::new(Arc::new(GoogleTts::from_config(&config.tts))),
            Box::new(TempFilePlayer::new(config.playback.command.clone())),
            SessionOptions::from(&config.session),
        )
    }

    /// Notice shown when AI answers are wanted but the model is unusable:
    /// no credential at start-up, or a credential the model later rejected.
    pub fn configuration_notice(&self) -> Option<String> {
        if !self.options.use_ai || self.generator.is_configured() {
            return None;
        }
        let notice = if self.generator.has_credential() {
            "The model rejected the API key. \
             Answers now come from the built-in keyword table."
        } else {
            "No model API key found (set GEMINI_API_KEY or GOOGLE_API_KEY). \
             Answers will use a simple templated fallback."
        };
        Some(notice.to_string())
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn history(&self) -> &[Turn] {
        self.log.turns()
    }

    // -----------------------------------------------------------------------
    // turn
    // -----------------------------------------------------------------------

    /// Process one question.  `requested` is the language the user selected.
    pub async fn turn(&mut self, input: TurnInput, requested: LanguageCode) -> PipelineResult {
        let mut result = PipelineResult::new(requested);

        // ── Input / transcription ─────────────────────────────────────────
        let (text, audio_bytes) = match input {
            TurnInput::Text(typed) => {
                let typed = typed.trim().to_string();
                if typed.is_empty() {
                    stage_failed(
                        &mut result,
                        Stage::Input,
                        ErrorClass::Input,
                        "Please enter a question",
                    );
                    return result;
                }
                (typed, None)
            }
            TurnInput::Audio(clip) => {
                if self.is_duplicate_audio(&clip.bytes) {
                    log::debug!("pipeline: same recording as last turn, skipping");
                    result.duplicate = true;
                    return result;
                }
                match self.transcriber.transcribe(&clip, requested).await {
                    Ok(transcript) => {
                        result.transcribed_text = Some(transcript.clone());
                        (transcript, Some(clip.bytes))
                    }
                    Err(e) => {
                        stage_failed(
                            &mut result,
                            Stage::Transcription,
                            e.class(),
                            e.to_string(),
                        );
                        return result;
                    }
                }
            }
        };

        result.input_text = Some(text.clone());
        if self.is_duplicate_text(&text) {
            log::debug!("pipeline: same question as last turn, skipping");
            result.duplicate = true;
            return result;
        }

        // ── Language detection / input translation ────────────────────────
        let detected = self.detector.detect(&text);
        result.detected_language = Some(detected);
        log::debug!("pipeline: detected {detected}, requested {requested}");

        let english = match self
            .translator
            .translate(&text, detected, DEFAULT_LANGUAGE)
            .await
        {
            Ok(english) => english,
            Err(e) => {
                stage_failed(&mut result, Stage::Translation, e.class(), e.to_string());
                return result;
            }
        };

        // ── Answer ────────────────────────────────────────────────────────
        let answer = self.generator.generate(&english, detected).await;
        log::debug!("pipeline: answer from {}", answer.source);
        result.answer_text = Some(answer.text.clone());
        result.answer_source = Some(answer.source);

        // ── Output translation ────────────────────────────────────────────
        let response = match self.options.response_language {
            ResponseLanguage::Requested => requested,
            ResponseLanguage::Detected => detected,
        };
        result.response_language = response;

        let (spoken, spoken_language) = match self
            .translator
            .translate(&answer.text, answer.language, response)
            .await
        {
            Ok(translated) => {
                result.translated_answer_text = Some(translated.clone());
                (translated, response)
            }
            Err(e) => {
                // Never ends the turn: the answer stays in its own language.
                log::warn!("pipeline: answer translation failed, keeping original: {e}");
                result.record_error(Stage::Translation, e.class(), e.to_string());
                result.translated_answer_text = Some(TRANSLATION_UNAVAILABLE.to_string());
                (answer.text.clone(), answer.language)
            }
        };

        // ── Synthesis ─────────────────────────────────────────────────────
        if self.options.synthesize {
            match self.synthesizer.synthesize(&spoken, spoken_language).await {
                Ok(clip) => result.audio_clip = Some(clip),
                Err(e) => {
                    log::warn!("pipeline: speech synthesis failed: {e}");
                    result.record_error(Stage::Synthesis, e.class(), e.to_string());
                }
            }
        }

        // ── Log + playback ────────────────────────────────────────────────
        self.log.push(Turn::new(Role::User, text.clone()));
        self.log.push(Turn::new(Role::Assistant, spoken));
        self.last_input = Some(LastInput {
            text,
            audio: audio_bytes,
        });

        if self.options.auto_play {
            if let Some(clip) = result.audio_clip.as_ref() {
                if let Err(e) = self.playback.start(clip) {
                    let e = SessionError::from(e);
                    log::warn!("pipeline: playback failed: {e}");
                    result.record_error(Stage::Playback, e.class(), e.to_string());
                }
            }
        }

        result
    }

    fn is_duplicate_text(&self, text: &str) -> bool {
        self.last_input.as_ref().is_some_and(|last| last.text == text)
    }

    fn is_duplicate_audio(&self, bytes: &[u8]) -> bool {
        self.last_input
            .as_ref()
            .and_then(|last| last.audio.as_deref())
            .is_some_and(|last| last == bytes)
    }

    // -----------------------------------------------------------------------
    // Playback / housekeeping
    // -----------------------------------------------------------------------

    /// Re-synthesise the assistant turn at `index` in the language detected
    /// from its own text, and play it.
    pub async fn speak_turn(&mut self, index: usize) -> Result<AudioClip, SessionError> {
        let turn = self.log.get(index).ok_or(SessionError::NoSuchTurn(index))?;
        if turn.role() != Role::Assistant {
            return Err(SessionError::NotAnAnswer(index));
        }
        let language = self.detector.detect(turn.text());
        let clip = self.synthesizer.synthesize(turn.text(), language).await?;
        self.playback.start(&clip)?;
        Ok(clip)
    }

    pub fn stop_playback(&mut self) {
        self.playback.stop();
    }

    /// Empty the log, forget the last input and release the active clip.
    /// Safe to call repeatedly.
    pub fn clear(&mut self) {
        self.log.clear();
        self.last_input = None;
        self.playback.stop();
        log::debug!("pipeline: conversation cleared");
    }
}

/// Record a failure that stops the turn.  Input and data rejections log at
/// `info`, anything else at `error`.
fn stage_failed(
    result: &mut PipelineResult,
    stage: Stage,
    class: ErrorClass,
    message: impl Into<String>,
) {
    let message = message.into();
    if class.ends_turn() {
        log::info!("pipeline: {stage} rejected ({class}): {message}");
    } else {
        log::error!("pipeline: {stage} failed ({class}): {message}");
    }
    result.record_error(stage, class, message);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
