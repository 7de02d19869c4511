//! Per-turn outcome: which stages produced what, and which failed.

use crate::audio::AudioClip;
use crate::error::ErrorClass;
use crate::language::LanguageCode;
use crate::llm::AnswerSource;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Stages of one conversation turn, in execution order.
///
/// ```text
/// Input ─▶ Transcription ─▶ Translation (in) ─▶ Generation
///       ─▶ Translation (out) ─▶ Synthesis ─▶ Playback
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Input,
    Transcription,
    Translation,
    Generation,
    Synthesis,
    Playback,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Input => "input",
            Stage::Transcription => "transcription",
            Stage::Translation => "translation",
            Stage::Generation => "generation",
            Stage::Synthesis => "synthesis",
            Stage::Playback => "playback",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// StageError
// ---------------------------------------------------------------------------

/// One failed stage of a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageError {
    pub stage: Stage,
    pub class: ErrorClass,
    pub message: String,
}

impl StageError {
    /// The failure stopped the turn rather than degrading it.
    pub fn ends_turn(&self) -> bool {
        self.class.ends_turn()
    }
}

// ---------------------------------------------------------------------------
// PipelineResult
// ---------------------------------------------------------------------------

/// Everything one call to
/// [`ConversationSession::turn`](crate::pipeline::ConversationSession::turn)
/// produced.  Built once per turn and not changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    /// The question as typed or transcribed, trimmed.
    pub input_text: Option<String>,
    /// Raw transcript, for audio turns only.
    pub transcribed_text: Option<String>,
    pub detected_language: Option<LanguageCode>,
    /// Language the answer is delivered in.
    pub response_language: LanguageCode,
    /// Answer before output translation.
    pub answer_text: Option<String>,
    pub answer_source: Option<AnswerSource>,
    /// Answer in `response_language`, or
    /// [`TRANSLATION_UNAVAILABLE`](crate::translate::TRANSLATION_UNAVAILABLE).
    pub translated_answer_text: Option<String>,
    pub audio_clip: Option<AudioClip>,
    /// Failures in stage order.
    pub errors: Vec<StageError>,
    /// The input repeated the previous turn; nothing was done.
    pub duplicate: bool,
}

impl PipelineResult {
    pub fn new(response_language: LanguageCode) -> Self {
        Self {
            input_text: None,
            transcribed_text: None,
            detected_language: None,
            response_language,
            answer_text: None,
            answer_source: None,
            translated_answer_text: None,
            audio_clip: None,
            errors: Vec::new(),
            duplicate: false,
        }
    }

    pub fn record_error(&mut self, stage: Stage, class: ErrorClass, message: impl Into<String>) {
        self.errors.push(StageError {
            stage,
            class,
            message: message.into(),
        });
    }

    pub fn error_for(&self, stage: Stage) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.stage == stage)
            .map(|e| e.message.as_str())
    }

    pub fn class_for(&self, stage: Stage) -> Option<ErrorClass> {
        self.errors.iter().find(|e| e.stage == stage).map(|e| e.class)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The turn produced an answer (possibly with non-fatal stage errors).
    pub fn answered(&self) -> bool {
        self.answer_text.is_some()
    }
}
