//! Text clean-up before speech synthesis.
//!
//! Model answers arrive as markdown with emoji; read aloud verbatim they
//! produce "asterisk asterisk" noise.  [`sanitize`] applies, in order:
//!
//! 1. strip emoji (emoticons, symbols & pictographs, transport, flags)
//! 2. strip markdown emphasis `*`, headers `#`, code backticks
//! 3. reduce `[text](url)` links to `text`
//! 4. replace anything that is not a word character, whitespace,
//!    Devanagari or `.,!?।` with a space
//! 5. turn `,` `;` `:` into spaces
//! 6. collapse whitespace
//! 7. truncate to [`MAX_TTS_CHARS`] characters, appending `"..."`

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest text handed to the synthesiser, in characters.
pub const MAX_TTS_CHARS: usize = 500;

const ELLIPSIS: &str = "...";

static EMOJI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{1F1E0}-\x{1F1FF}]+")
        .expect("valid regex")
});

static MARKDOWN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*+|#+|`+").expect("valid regex")
});

static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid regex")
});

static DISALLOWED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w\s\x{0900}-\x{097F}.,!?।]")
        .expect("valid regex")
});

/// Clean `text` for synthesis.  Returns `None` when nothing speakable is left.
pub fn sanitize(text: &str) -> Option<String> {
    let text = EMOJI.replace_all(text, "");
    let text = MARKDOWN.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");
    let text = DISALLOWED.replace_all(&text, " ");
    let text = text.replace([',', ';', ':'], " ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if text.is_empty() {
        return None;
    }
    Some(truncate(&text, MAX_TTS_CHARS))
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}
