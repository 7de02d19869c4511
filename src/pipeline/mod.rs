//! Conversation pipeline.
//!
//! This module wires the full question → answer flow and keeps the
//! conversation log.
//!
//! # Architecture
//!
//! ```text
//! TurnInput::Text / TurnInput::Audio
//!        │
//!        ▼
//! ConversationSession::turn()
//!        │
//!        ├─ SpeechTranscriber::transcribe      (audio only)
//!        ├─ LanguageDetector::detect
//!        ├─ Translator::translate  → English
//!        ├─ AnswerGenerator::generate
//!        ├─ Translator::translate  → response language
//!        ├─ SpeechSynthesizer::synthesize
//!        └─ Playback::start                    (auto-play)
//!
//! ConversationLog ◀── User + Assistant turns of every completed question
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use agri_voice::config::AppConfig;
//! use agri_voice::language::LanguageCode;
//! use agri_voice::pipeline::{ConversationSession, TurnInput};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let mut session = ConversationSession::from_config(&config);
//!
//!     let result = session
//!         .turn(TurnInput::Text("When should I sow wheat?".into()), LanguageCode::Hi)
//!         .await;
//!     if let Some(answer) = result.translated_answer_text {
//!         println!("{answer}");
//!     }
//! }
//! ```

pub mod history;
pub mod result;
pub mod session;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use history::{ConversationLog, Role, Turn};
pub use result::{PipelineResult, Stage, StageError};
pub use session::{ConversationSession, SessionError, SessionOptions, TurnInput};
