//! Speech synthesis.
//!
//! ```text
//! answer text ─▶ sanitize ─▶ SpeechBackend (GoogleTts) ─▶ AudioClip (MP3)
//!                              │ UnsupportedLanguage
//!                              └─▶ one retry in the default language
//! ```

pub mod google;
pub mod sanitize;
pub mod synthesizer;

pub use google::GoogleTts;
pub use sanitize::{sanitize, MAX_TTS_CHARS};
pub use synthesizer::{SpeechBackend, SpeechSynthesizer, SynthesisError};

#[cfg(test)]
pub use synthesizer::MockBackend;
