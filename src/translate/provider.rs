//! `TranslationProvider` trait and `TranslationError`.

use async_trait::async_trait;
use thiserror::Error;

use crate::error::ErrorClass;
use crate::language::LanguageCode;

// ---------------------------------------------------------------------------
// TranslationError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TranslationError {
    /// Network failure, timeout, server error or an unusable response.
    #[error("translation service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The provider does not translate between these two languages.
    #[error("cannot translate from {from} to {to}")]
    UnsupportedPair { from: LanguageCode, to: LanguageCode },
}

impl TranslationError {
    pub fn class(&self) -> ErrorClass {
        match self {
            TranslationError::ServiceUnavailable(_) => ErrorClass::Service,
            TranslationError::UnsupportedPair { .. } => ErrorClass::Input,
        }
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranslationError::ServiceUnavailable("request timed out".into())
        } else {
            TranslationError::ServiceUnavailable(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// TranslationProvider trait
// ---------------------------------------------------------------------------

/// A machine-translation backend.
///
/// Implementations are only called with `from != to`; the identity case is
/// handled by [`Translator`](crate::translate::Translator).
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<String, TranslationError>;
}

// ---------------------------------------------------------------------------
// MockProvider  (test-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use mock::MockProvider;

#[cfg(test)]
mod mock {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Records every call.  Answers from a lookup table keyed by
    /// `(text, to)`, else tags the text with the target code
    /// (`"[hi] text"`).
    pub struct MockProvider {
        table: HashMap<(String, LanguageCode), String>,
        fail_to: Option<LanguageCode>,
        calls: AtomicUsize,
        log: Mutex<Vec<(String, LanguageCode, LanguageCode)>>,
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self {
                table: HashMap::new(),
                fail_to: None,
                calls: AtomicUsize::new(0),
                log: Mutex::new(Vec::new()),
            }
        }

        pub fn with(mut self, text: &str, to: LanguageCode, output: &str) -> Self {
            self.table.insert((text.to_string(), to), output.to_string());
            self
        }

        /// Fail every request whose target is `to`.
        pub fn failing_to(mut self, to: LanguageCode) -> Self {
            self.fail_to = Some(to);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn requests(&self) -> Vec<(String, LanguageCode, LanguageCode)> {
            self.log.lock().map(|l| l.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl TranslationProvider for MockProvider {
        async fn translate(
            &self,
            text: &str,
            from: LanguageCode,
            to: LanguageCode,
        ) -> Result<String, TranslationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut log) = self.log.lock() {
                log.push((text.to_string(), from, to));
            }
            if self.fail_to == Some(to) {
                return Err(TranslationError::ServiceUnavailable("mock outage".into()));
            }
            Ok(self
                .table
                .get(&(text.to_string(), to))
                .cloned()
                .unwrap_or_else(|| format!("[{to}] {text}")))
        }
    }
}
