//! Translation between supported languages.
//!
//! * [`TranslationProvider`]: async trait implemented by backends.
//! * [`GoogleTranslate`]: `translate_a/single` JSON endpoint.
//! * [`Translator`]: identity short-circuit wrapper used by the pipeline.

pub mod google;
pub mod provider;
pub mod translator;

pub use google::GoogleTranslate;
pub use provider::{TranslationError, TranslationProvider};
pub use translator::{Translator, TRANSLATION_UNAVAILABLE};

#[cfg(test)]
pub use provider::MockProvider;
