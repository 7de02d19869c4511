//! Prompt builder for farming questions.
//!
//! Hindi and English have dedicated instruction templates.  Every other
//! local language reuses the English template with the final rule rewritten
//! to demand an answer in that language.

use crate::language::LanguageCode;

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// `{question}` is replaced with the user's question.
const TEMPLATE_HI: &str = "\
आप एक अनुभवी कृषि विशेषज्ञ हैं। उपयोगकर्ता ने पूछा: \"{question}\"

निम्नलिखित जानकारी प्रदान करें:
1. सीधा और व्यावहारिक जवाब दें
2. फसलों के नाम, बुवाई का समय, मिट्टी की आवश्यकता बताएं
3. सिंचाई, उर्वरक और कीट नियंत्रण की सलाह दें
4. स्थानीय कृषि अधिकारी से संपर्क करने की सलाह दें
5. संक्षिप्त और स्पष्ट जवाब दें
6. हमेशा हिंदी में जवाब दें";

/// `{question}` and `{language}` are replaced.
const TEMPLATE_EN: &str = "\
You are an experienced agricultural expert. The user asked: \"{question}\"

Provide the following information:
1. Give direct and practical answers
2. Mention crop names, planting seasons, soil requirements
3. Advise on irrigation, fertilizers, and pest control
4. Suggest contacting local agricultural officers
5. Keep responses concise and clear
6. Always respond in {language}";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds the instruction prompt for one question.
///
/// # Example
/// ```rust
/// use agri_voice::language::LanguageCode;
/// use agri_voice::llm::PromptBuilder;
///
/// let prompt = PromptBuilder::new(LanguageCode::Ta).build("When to sow paddy?");
/// assert!(prompt.contains("Always respond in Tamil"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    language: LanguageCode,
}

impl PromptBuilder {
    pub fn new(language: LanguageCode) -> Self {
        Self { language }
    }

    pub fn build(&self, question: &str) -> String {
        let question = question.trim();
        match self.language {
            LanguageCode::Hi => TEMPLATE_HI.replace("{question}", question),
            other => TEMPLATE_EN
                .replace("{language}", other.display_name())
                .replace("{question}", question),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hindi_uses_hindi_template() {
        let p = PromptBuilder::new(LanguageCode::Hi).build("गेहूं कब बोएं?");
        assert!(p.contains("अनुभवी कृषि विशेषज्ञ"));
        assert!(p.contains("\"गेहूं कब बोएं?\""));
        assert!(p.contains("हमेशा हिंदी में जवाब दें"));
        assert!(!p.contains("{question}"));
    }

    #[test]
    fn english_template_demands_english() {
        let p = PromptBuilder::new(LanguageCode::En).build("  wheat sowing season ");
        assert!(p.contains("experienced agricultural expert"));
        assert!(p.contains("\"wheat sowing season\""));
        assert!(p.contains("local agricultural officers"));
        assert!(p.ends_with("Always respond in English"));
    }

    #[test]
    fn other_local_languages_get_explicit_rule() {
        for code in [LanguageCode::Mr, LanguageCode::Bn, LanguageCode::Ur] {
            let p = PromptBuilder::new(code).build("q");
            assert!(p.ends_with(&format!("Always respond in {}", code.display_name())));
        }
    }

    #[test]
    fn placeholder_in_question_is_not_expanded() {
        let p = PromptBuilder::new(LanguageCode::En).build("what is {language}?");
        assert!(p.contains("\"what is {language}?\""));
    }
}
