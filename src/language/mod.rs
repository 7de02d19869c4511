//! Language codes and script-based language detection.

pub mod code;
pub mod detect;

pub use code::{LanguageCode, DEFAULT_LANGUAGE};
pub use detect::LanguageDetector;
