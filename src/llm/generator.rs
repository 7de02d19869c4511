//! `AnswerGenerator`: three-tier answer production that never fails.
//!
//! | Tier | Condition                    | Answer                          |
//! |------|------------------------------|---------------------------------|
//! | 1    | no credential configured     | templated "configure AI" text   |
//! | 2    | credential present           | generative model                |
//! | 3    | model error, or AI disabled  | keyword table, else echo        |
//!
//! A model error of class [`ErrorClass::Configuration`] (rejected key) turns
//! the model off for the rest of the generator's life; later questions go
//! straight to tier 3.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::ErrorClass;
use crate::language::LanguageCode;
use crate::llm::fallback::{keyword_answer, unconfigured_answer};
use crate::llm::model::{GeminiModel, LanguageModel};
use crate::llm::prompt::PromptBuilder;

// ---------------------------------------------------------------------------
// AnswerResult
// ---------------------------------------------------------------------------

/// Which tier produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Model,
    Unconfigured,
    /// Keyword rule, by name.
    Keyword(&'static str),
    Echo,
}

impl fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerSource::Model => f.write_str("model"),
            AnswerSource::Unconfigured => f.write_str("unconfigured"),
            AnswerSource::Keyword(rule) => write!(f, "keyword:{rule}"),
            AnswerSource::Echo => f.write_str("echo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerResult {
    pub text: String,
    /// Language `text` is written in.
    pub language: LanguageCode,
    pub source: AnswerSource,
}

// ---------------------------------------------------------------------------
// AnswerGenerator
// ---------------------------------------------------------------------------

/// Produces an answer for every question.
///
/// # Example
/// ```rust
/// use agri_voice::language::LanguageCode;
/// use agri_voice::llm::{AnswerGenerator, AnswerSource};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let generator = AnswerGenerator::new(None);
/// let answer = rt.block_on(generator.generate("wheat sowing season", LanguageCode::En));
/// assert_eq!(answer.source, AnswerSource::Unconfigured);
/// ```
#[derive(Clone)]
pub struct AnswerGenerator {
    model: Option<Arc<dyn LanguageModel>>,
    use_ai: bool,
    /// Set once the model rejects the credential.
    disabled: Arc<AtomicBool>,
}

impl AnswerGenerator {
    /// `None` means no credential is configured (tier 1).
    pub fn new(model: Option<Arc<dyn LanguageModel>>) -> Self {
        Self {
            model,
            use_ai: true,
            disabled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Resolve the credential and build a Gemini-backed generator.
    pub fn from_config(config: &LlmConfig) -> Self {
        let model = config
            .resolve_api_key()
            .map(|key| Arc::new(GeminiModel::new(config, key)) as Arc<dyn LanguageModel>);
        Self::new(model)
    }

    /// `false` skips tiers 1 and 2 and answers from the keyword table.
    pub fn with_ai(mut self, use_ai: bool) -> Self {
        self.use_ai = use_ai;
        self
    }

    pub fn has_credential(&self) -> bool {
        self.model.is_some()
    }

    /// A credential exists and the model has not rejected it.
    pub fn is_configured(&self) -> bool {
        self.model.is_some() && !self.disabled.load(Ordering::Relaxed)
    }

    /// Answer `question`, asking the model to reply in `language`.
    ///
    /// Never fails: every error degrades to the next tier.
    pub async fn generate(&self, question: &str, language: LanguageCode) -> AnswerResult {
        if !self.use_ai {
            return keyword_answer(question, language);
        }

        let Some(model) = self.model.as_ref() else {
            return unconfigured_answer(question);
        };
        if self.disabled.load(Ordering::Relaxed) {
            return keyword_answer(question, language);
        }

        let prompt = PromptBuilder::new(language).build(question);
        match model.generate(&prompt).await {
            Ok(text) => AnswerResult {
                text,
                language,
                source: AnswerSource::Model,
            },
            Err(e) if e.class() == ErrorClass::Configuration => {
                log::error!("llm: {e}; model disabled, answering from the keyword table");
                self.disabled.store(true, Ordering::Relaxed);
                keyword_answer(question, language)
            }
            Err(e) => {
                log::warn!("llm: generation failed ({e}); using keyword fallback");
                keyword_answer(question, language)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
