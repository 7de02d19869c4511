//! Audio clips, pre-upload validation and single-slot playback.
//!
//! # Flow
//!
//! ```text
//! recorder / file ─▶ AudioClip ─▶ ClipValidator ─▶ SpeechTranscriber
//! SpeechSynthesizer ─▶ AudioClip ─▶ Playback (one active clip at a time)
//! ```

pub mod clip;
pub mod playback;

pub use clip::{AudioClip, AudioEncoding, ClipError, ClipInfo, ClipValidator};
pub use playback::{Playback, PlaybackError, TempFilePlayer};
