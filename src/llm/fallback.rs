//! Deterministic answers used when the generative model is off, missing or
//! failing.
//!
//! [`FALLBACK_RULES`] is scanned in order; the first rule with a keyword
//! contained in the lowercased question wins.  With no match the question is
//! echoed back with a request for more detail.

use crate::language::LanguageCode;
use crate::llm::generator::{AnswerResult, AnswerSource};

/// One keyword rule with a Hindi and an English canned answer.
#[derive(Debug)]
pub struct FallbackRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub answer_hi: &'static str,
    pub answer_en: &'static str,
}

impl FallbackRule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

pub static FALLBACK_RULES: &[FallbackRule] = &[
    FallbackRule {
        name: "summer",
        keywords: &["summer", "गर्मी", "ग्रीष्म"],
        answer_hi: "गर्मियों में आप ये फसलें उगा सकते हैं: तरबूज, खरबूजा, भिंडी, करेला, टमाटर, मिर्च, मक्का, लोबिया, मूंग। इन्हें पर्याप्त पानी और धूप की जरूरत होती है।",
        answer_en: "For summer, you can grow: watermelon, muskmelon, okra, bitter gourd, tomato, chili, maize, cowpea, moong. These need adequate water and sunlight.",
    },
    FallbackRule {
        name: "winter",
        keywords: &["winter", "सर्दी", "शीत"],
        answer_hi: "सर्दियों में आप ये फसलें उगा सकते हैं: गेहूं, चना, सरसों, आलू, प्याज, गाजर, मूली, पालक। ये ठंडे मौसम में अच्छी तरह उगती हैं।",
        answer_en: "For winter, you can grow: wheat, chickpea, mustard, potato, onion, carrot, radish, spinach. These grow well in cold weather.",
    },
    FallbackRule {
        name: "crop",
        keywords: &["फसल", "crop", "बीज", "seed", "खेती", "farming"],
        answer_hi: "मैं आपकी फसल संबंधी जानकारी में मदद कर सकता हूं। कृपया बताएं कि आप कौन सी फसल के बारे में जानना चाहते हैं - जैसे गेहूं, चावल, सब्जियां, या फल।",
        answer_en: "I can help you with crop information. Please tell me which crop you want to know about - like wheat, rice, vegetables, or fruits.",
    },
    FallbackRule {
        name: "weather",
        keywords: &["मौसम", "weather", "बारिश", "rain", "तापमान", "temperature"],
        answer_hi: "मौसम की जानकारी के लिए आप अपने स्थानीय मौसम विभाग से संपर्क कर सकते हैं या मौसम ऐप का उपयोग कर सकते हैं।",
        answer_en: "For weather information, you can contact your local weather department or use a weather app.",
    },
    FallbackRule {
        name: "advice",
        keywords: &["सलाह", "advice", "मदद", "help", "कैसे", "how"],
        answer_hi: "मैं आपकी कृषि संबंधी समस्याओं में मदद कर सकता हूं। कृपया अपनी समस्या को विस्तार से बताएं।",
        answer_en: "I can help you with agricultural problems. Please describe your issue in detail.",
    },
];

/// Canned answers exist in Hindi and English only.
fn canned_language(language: LanguageCode) -> LanguageCode {
    match language {
        LanguageCode::Hi => LanguageCode::Hi,
        _ => LanguageCode::En,
    }
}

/// Keyword-table answer, or an echo of the question when nothing matches.
pub fn keyword_answer(question: &str, language: LanguageCode) -> AnswerResult {
    let lowered = question.to_lowercase();
    let language = canned_language(language);

    if let Some(rule) = FALLBACK_RULES.iter().find(|r| r.matches(&lowered)) {
        let text = match language {
            LanguageCode::Hi => rule.answer_hi,
            _ => rule.answer_en,
        };
        return AnswerResult {
            text: text.to_string(),
            language,
            source: AnswerSource::Keyword(rule.name),
        };
    }

    let question = question.trim();
    let text = match language {
        LanguageCode::Hi => format!(
            "मैंने आपकी बात सुनी: '{question}'। कृपया अपनी कृषि संबंधी जरूरतों के बारे में बताएं।"
        ),
        _ => format!("I heard you say: '{question}'. Please tell me about your agricultural needs."),
    };
    AnswerResult {
        text,
        language,
        source: AnswerSource::Echo,
    }
}

/// Templated answer given when no model credential is configured.  Always
/// English; the pipeline translates it like any other answer.
pub fn unconfigured_answer(question: &str) -> AnswerResult {
    let text = format!(
        "Based on your query '{}', here's some helpful information:\n\n\
         • This is a crop-related query about agricultural practices\n\
         • Consider consulting local agricultural experts for specific advice\n\n\
         Note: To get AI-powered responses, please add your Google API key to the environment variables.",
        question.trim()
    );
    AnswerResult {
        text,
        language: LanguageCode::En,
        source: AnswerSource::Unconfigured,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summer_in_hindi() {
        let a = keyword_answer("Which crops grow in Summer?", LanguageCode::Hi);
        assert_eq!(a.source, AnswerSource::Keyword("summer"));
        assert_eq!(a.language, LanguageCode::Hi);
        assert!(a.text.starts_with("गर्मियों में आप ये फसलें उगा सकते हैं"));
    }

    #[test]
    fn devanagari_keyword_matches() {
        let a = keyword_answer("सर्दी में क्या बोएं", LanguageCode::En);
        assert_eq!(a.source, AnswerSource::Keyword("winter"));
        assert!(a.text.starts_with("For winter"));
    }

    #[test]
    fn first_matching_rule_wins() {
        // "crop" and "summer" both match; summer comes first.
        let a = keyword_answer("best crop for summer", LanguageCode::En);
        assert_eq!(a.source, AnswerSource::Keyword("summer"));
        // "how" (advice) and "rain" (weather) both match; weather comes first.
        let a = keyword_answer("how much rain", LanguageCode::En);
        assert_eq!(a.source, AnswerSource::Keyword("weather"));
    }

    #[test]
    fn no_match_echoes_question() {
        let a = keyword_answer("  tractor prices ", LanguageCode::En);
        assert_eq!(a.source, AnswerSource::Echo);
        assert_eq!(
            a.text,
            "I heard you say: 'tractor prices'. Please tell me about your agricultural needs."
        );

        let a = keyword_answer("ट्रैक्टर", LanguageCode::Hi);
        assert!(a.text.starts_with("मैंने आपकी बात सुनी: 'ट्रैक्टर'"));
    }

    #[test]
    fn non_hindi_local_language_gets_english() {
        let a = keyword_answer("winter", LanguageCode::Ta);
        assert_eq!(a.language, LanguageCode::En);
        assert!(a.text.starts_with("For winter"));
    }

    #[test]
    fn every_rule_has_both_answers() {
        for rule in FALLBACK_RULES {
            assert!(!rule.keywords.is_empty(), "{}", rule.name);
            assert!(!rule.answer_hi.is_empty() && !rule.answer_en.is_empty());
            // Keywords are matched against lowercased text.
            assert!(rule.keywords.iter().all(|k| k.to_lowercase() == *k));
        }
    }

    #[test]
    fn unconfigured_quotes_question() {
        let a = unconfigured_answer("wheat sowing season");
        assert_eq!(a.source, AnswerSource::Unconfigured);
        assert!(a.text.contains("'wheat sowing season'"));
        assert!(a.text.contains("AI-powered responses"));
    }
}
