//! Script-based language detection.
//!
//! [`LanguageDetector`] classifies text by counting characters that fall in
//! each supported regional script's Unicode block.  The script with the most
//! characters wins; text without any regional-script characters is reported
//! as the default language.
//!
//! This is a heuristic.  Several languages share a script (Marathi is written
//! in Devanagari, like Hindi), and the table maps each script to a single
//! language, so Marathi text is reported as Hindi.

use super::code::{LanguageCode, DEFAULT_LANGUAGE};

// ---------------------------------------------------------------------------
// Script table
// ---------------------------------------------------------------------------

struct ScriptRange {
    language: LanguageCode,
    start: char,
    end: char,
}

/// Ordered script table; earlier entries win ties.
static SCRIPTS: &[ScriptRange] = &[
    // Devanagari
    ScriptRange { language: LanguageCode::Hi, start: '\u{0900}', end: '\u{097F}' },
    // Bengali
    ScriptRange { language: LanguageCode::Bn, start: '\u{0980}', end: '\u{09FF}' },
    // Gujarati
    ScriptRange { language: LanguageCode::Gu, start: '\u{0A80}', end: '\u{0AFF}' },
    // Tamil
    ScriptRange { language: LanguageCode::Ta, start: '\u{0B80}', end: '\u{0BFF}' },
    // Telugu
    ScriptRange { language: LanguageCode::Te, start: '\u{0C00}', end: '\u{0C7F}' },
    // Kannada
    ScriptRange { language: LanguageCode::Kn, start: '\u{0C80}', end: '\u{0CFF}' },
    // Malayalam
    ScriptRange { language: LanguageCode::Ml, start: '\u{0D00}', end: '\u{0D7F}' },
    // Arabic (Urdu)
    ScriptRange { language: LanguageCode::Ur, start: '\u{0600}', end: '\u{06FF}' },
];

impl ScriptRange {
    #[inline]
    fn contains(&self, c: char) -> bool {
        (self.start..=self.end).contains(&c)
    }
}

// ---------------------------------------------------------------------------
// LanguageDetector
// ---------------------------------------------------------------------------

/// Classifies text into a [`LanguageCode`] from character statistics alone.
///
/// # Example
/// ```rust
/// use agri_voice::language::{LanguageCode, LanguageDetector};
///
/// let detector = LanguageDetector::new();
/// assert_eq!(detector.detect("गेहूं की बुवाई कब करें"), LanguageCode::Hi);
/// assert_eq!(detector.detect("when to sow wheat"), LanguageCode::En);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageDetector;

impl LanguageDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect the language of `text`.  Never fails.
    pub fn detect(&self, text: &str) -> LanguageCode {
        let mut counts = [0usize; SCRIPTS.len()];
        for c in text.chars() {
            if let Some(idx) = SCRIPTS.iter().position(|s| s.contains(c)) {
                counts[idx] += 1;
            }
        }

        // Strictly-greater comparison keeps the earliest script on ties.
        let mut best: Option<(usize, usize)> = None;
        for (idx, &count) in counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((idx, count)),
            }
        }

        best.map_or(DEFAULT_LANGUAGE, |(idx, _)| SCRIPTS[idx].language)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
