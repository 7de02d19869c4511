//! Answer generation for farming questions.
//!
//! This module provides:
//! * [`LanguageModel`]: async trait implemented by hosted model backends.
//! * [`GeminiModel`]: Generative Language API client.
//! * [`PromptBuilder`]: Hindi/English expert-advice prompts.
//! * [`FALLBACK_RULES`]: ordered keyword table with canned answers.
//! * [`AnswerGenerator`]: three-tier wrapper that never fails.
//! * [`LlmError`]: error variants for model calls.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use agri_voice::config::AppConfig;
//! use agri_voice::language::LanguageCode;
//! use agri_voice::llm::AnswerGenerator;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let generator = AnswerGenerator::from_config(&config.llm);
//!     let answer = generator.generate("When should I sow wheat?", LanguageCode::En).await;
//!     println!("[{}] {}", answer.source, answer.text);
//! }
//! ```

pub mod fallback;
pub mod generator;
pub mod model;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use fallback::{keyword_answer, unconfigured_answer, FallbackRule, FALLBACK_RULES};
pub use generator::{AnswerGenerator, AnswerResult, AnswerSource};
pub use model::{GeminiModel, LanguageModel, LlmError};
pub use prompt::PromptBuilder;

#[cfg(test)]
pub use model::MockModel;
