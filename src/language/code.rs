//! Supported language codes.
//!
//! [`LanguageCode`] is the closed set of languages the assistant can listen
//! to, translate between and speak.  Anything arriving from outside the
//! crate (config files, CLI flags, provider responses) goes through
//! [`LanguageCode::parse_or_default`], so unsupported codes degrade to the
//! default language instead of failing.

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// LanguageCode
// ---------------------------------------------------------------------------

/// A supported language.  [`LanguageCode::En`] is the default and the
/// working language of the answer generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    En,
    Hi,
    Mr,
    Ta,
    Te,
    Bn,
    Gu,
    Kn,
    Ml,
    Ur,
}

/// The fallback language used whenever no other signal is available.
pub const DEFAULT_LANGUAGE: LanguageCode = LanguageCode::En;

impl Default for LanguageCode {
    fn default() -> Self {
        DEFAULT_LANGUAGE
    }
}

impl LanguageCode {
    /// Every supported language, default first, then in selection-list order.
    pub const ALL: [LanguageCode; 10] = [
        LanguageCode::En,
        LanguageCode::Hi,
        LanguageCode::Mr,
        LanguageCode::Ta,
        LanguageCode::Te,
        LanguageCode::Bn,
        LanguageCode::Gu,
        LanguageCode::Kn,
        LanguageCode::Ml,
        LanguageCode::Ur,
    ];

    /// ISO-639-1 code as used by the translation and speech services.
    pub fn as_str(self) -> &'static str {
        match self {
            LanguageCode::En => "en",
            LanguageCode::Hi => "hi",
            LanguageCode::Mr => "mr",
            LanguageCode::Ta => "ta",
            LanguageCode::Te => "te",
            LanguageCode::Bn => "bn",
            LanguageCode::Gu => "gu",
            LanguageCode::Kn => "kn",
            LanguageCode::Ml => "ml",
            LanguageCode::Ur => "ur",
        }
    }

    /// English display name, e.g. `"Hindi"`.
    pub fn display_name(self) -> &'static str {
        match self {
            LanguageCode::En => "English",
            LanguageCode::Hi => "Hindi",
            LanguageCode::Mr => "Marathi",
            LanguageCode::Ta => "Tamil",
            LanguageCode::Te => "Telugu",
            LanguageCode::Bn => "Bengali",
            LanguageCode::Gu => "Gujarati",
            LanguageCode::Kn => "Kannada",
            LanguageCode::Ml => "Malayalam",
            LanguageCode::Ur => "Urdu",
        }
    }

    /// Recognition locale (Indian regional variant), e.g. `"hi-IN"`.
    pub fn locale(self) -> String {
        format!("{}-IN", self.as_str())
    }

    /// Strict parse of an ISO code or display name (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        let needle = value.trim();
        Self::ALL.into_iter().find(|code| {
            code.as_str().eq_ignore_ascii_case(needle)
                || code.display_name().eq_ignore_ascii_case(needle)
                || code.locale().eq_ignore_ascii_case(needle)
        })
    }

    /// Parse `value`, degrading to [`DEFAULT_LANGUAGE`] when it is not in
    /// the supported set.
    pub fn parse_or_default(value: &str) -> Self {
        Self::parse(value).unwrap_or_else(|| {
            log::warn!("unsupported language code {value:?}; using {DEFAULT_LANGUAGE}");
            DEFAULT_LANGUAGE
        })
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts anything [`LanguageCode::parse`] does; unsupported values degrade
/// to [`DEFAULT_LANGUAGE`] so one bad field cannot reject a whole file.
impl<'de> Deserialize<'de> for LanguageCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_or_default(&raw))
    }
}

impl std::str::FromStr for LanguageCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            let supported: Vec<&str> = Self::ALL.iter().map(|c| c.as_str()).collect();
            format!("unsupported language {s:?} (supported: {})", supported.join(", "))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
