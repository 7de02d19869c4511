//! `Translator`: identity short-circuit in front of a provider.

use std::sync::Arc;

use crate::language::LanguageCode;
use crate::translate::provider::{TranslationError, TranslationProvider};

/// Substitute shown in place of an answer whose translation failed.
pub const TRANSLATION_UNAVAILABLE: &str = "[translation unavailable]";

/// Translates text between two supported languages.
///
/// Same-language requests (and blank text) are returned unchanged without
/// touching the provider.
#[derive(Clone)]
pub struct Translator {
    provider: Arc<dyn TranslationProvider>,
}

impl Translator {
    pub fn new(provider: Arc<dyn TranslationProvider>) -> Self {
        Self { provider }
    }

    pub async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<String, TranslationError> {
        if from == to || text.trim().is_empty() {
            return Ok(text.to_string());
        }
        match self.provider.translate(text, from, to).await {
            Ok(out) => Ok(out),
            Err(e) => {
                log::warn!("translate: {from}→{to} failed: {e}");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::provider::MockProvider;

    #[tokio::test]
    async fn identity_pairs_never_call_provider() {
        let provider = Arc::new(MockProvider::new());
        let translator = Translator::new(provider.clone());

        for code in LanguageCode::ALL {
            let out = translator.translate("गेहूं", code, code).await.unwrap();
            assert_eq!(out, "गेहूं");
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn blank_text_is_not_sent() {
        let provider = Arc::new(MockProvider::new());
        let translator = Translator::new(provider.clone());
        let out = translator
            .translate("  ", LanguageCode::Hi, LanguageCode::En)
            .await
            .unwrap();
        assert_eq!(out, "  ");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn different_pair_delegates() {
        let provider = Arc::new(MockProvider::new().with("नमस्ते", LanguageCode::En, "Hello"));
        let translator = Translator::new(provider.clone());
        let out = translator
            .translate("नमस्ते", LanguageCode::Hi, LanguageCode::En)
            .await
            .unwrap();
        assert_eq!(out, "Hello");
        assert_eq!(
            provider.requests(),
            vec![("नमस्ते".to_string(), LanguageCode::Hi, LanguageCode::En)]
        );
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let provider = Arc::new(MockProvider::new().failing_to(LanguageCode::Ta));
        let translator = Translator::new(provider);
        let err = translator
            .translate("rice", LanguageCode::En, LanguageCode::Ta)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslationError::ServiceUnavailable(_)));
    }
}
