//! Speech-recognition module.
//!
//! ```text
//! AudioClip ─▶ ClipValidator ─▶ HttpTranscriber ─▶ check_transcript ─▶ text
//!               (local)          (POST /v1/audio/transcriptions)
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use agri_voice::audio::AudioClip;
//! use agri_voice::config::SttConfig;
//! use agri_voice::language::LanguageCode;
//! use agri_voice::stt::{HttpTranscriber, SpeechTranscriber};
//!
//! # async fn run() {
//! let stt = HttpTranscriber::from_config(&SttConfig::default());
//! let clip = AudioClip::read_from("question.wav".as_ref()).unwrap();
//! match stt.transcribe(&clip, LanguageCode::Hi).await {
//!     Ok(text) => println!("{text}"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! # }
//! ```

pub mod engine;
pub mod http;

pub use engine::{check_transcript, SpeechTranscriber, TranscriptionError, MIN_TRANSCRIPT_CHARS};
pub use http::HttpTranscriber;

// test-only re-export so the pipeline tests can import the double directly.
#[cfg(test)]
pub use engine::MockTranscriber;
