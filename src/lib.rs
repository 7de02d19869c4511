//! Multilingual voice assistant for farmers.
//!
//! A question arrives as recorded audio or typed text in one of the
//! supported Indian languages, is routed through English to a generative
//! model (with deterministic fallbacks), and the answer comes back as text
//! and synthesised speech in the user's language.
//!
//! Entry point for library users: [`pipeline::ConversationSession`].

pub mod audio;
pub mod config;
pub mod error;
pub mod language;
pub mod llm;
pub mod pipeline;
pub mod stt;
pub mod translate;
pub mod tts;
pub mod yield_model;
