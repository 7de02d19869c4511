//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::language::LanguageCode;

/// Environment variables checked (in order) for the generative-model key.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

// ---------------------------------------------------------------------------
// ResponseLanguage
// ---------------------------------------------------------------------------

/// Which language the assistant answers in.
///
/// | Variant   | Answer language                                   |
/// |-----------|---------------------------------------------------|
/// | Requested | The language the user selected (default)          |
/// | Detected  | The language detected from the user's own words   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseLanguage {
    #[default]
    Requested,
    Detected,
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Conversation behaviour switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Language selected when no `--language` flag is given.
    pub language: LanguageCode,
    /// Use the generative model at all.  When `false` answers come straight
    /// from the keyword table.
    pub use_ai: bool,
    /// Synthesise speech for every answer.
    pub synthesize: bool,
    /// Start playback of every synthesised answer automatically.
    pub auto_play: bool,
    /// Language the answer is delivered in.
    pub response_language: ResponseLanguage,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: LanguageCode::Hi,
            use_ai: true,
            synthesize: true,
            auto_play: true,
            response_language: ResponseLanguage::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the hosted generative-language model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the Generative Language API.
    pub base_url: String,
    /// API key.  The `GEMINI_API_KEY` / `GOOGLE_API_KEY` environment
    /// variables take precedence over this field.
    pub api_key: Option<String>,
    /// Model identifier (e.g. `"gemini-1.5-flash-latest"`).
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    /// Maximum seconds to wait for a response.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            model: "gemini-1.5-flash-latest".into(),
            temperature: 1.0,
            top_p: 0.95,
            top_k: 64,
            max_output_tokens: 8192,
            timeout_secs: 30,
        }
    }
}

impl LlmConfig {
    /// Resolve the credential from the process environment, falling back to
    /// the config file.  Empty values count as absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        Self::resolve_with(|name| std::env::var(name).ok(), self.api_key.as_deref())
    }

    fn resolve_with(
        lookup: impl Fn(&str) -> Option<String>,
        configured: Option<&str>,
    ) -> Option<String> {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(*name))
            .chain(configured.map(str::to_string))
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the speech-recognition service (OpenAI-compatible
/// `/v1/audio/transcriptions`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    pub base_url: String,
    /// Bearer token; `None` for local servers that need no authentication.
    pub api_key: Option<String>,
    pub model: String,
    /// Minimum audio payload in bytes before a clip is worth sending.
    pub min_audio_bytes: usize,
    pub timeout_secs: u64,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            api_key: None,
            model: "whisper-1".into(),
            min_audio_bytes: 1000,
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// TranslateConfig
// ---------------------------------------------------------------------------

/// Settings for the translation provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.googleapis.com".into(),
            timeout_secs: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Settings for the speech-synthesis provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    pub base_url: String,
    /// Slower, more deliberate speech.
    pub slow: bool,
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.google.com".into(),
            slow: false,
            timeout_secs: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// PlaybackConfig
// ---------------------------------------------------------------------------

/// Local playback of synthesised answers.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlaybackConfig {
    /// Player command; the clip path is appended (e.g. `"mpv --no-video"`).
    /// `None` only stages the clip in a temporary file.
    pub command: Option<String>,
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use agri_voice::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub llm: LlmConfig,
    pub stt: SttConfig,
    pub translate: TranslateConfig,
    pub tts: TtsConfig,
    pub playback: PlaybackConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.session.language, loaded.session.language);
        assert_eq!(original.session.use_ai, loaded.session.use_ai);
        assert_eq!(
            original.session.response_language,
            loaded.session.response_language
        );
        assert_eq!(original.llm.base_url, loaded.llm.base_url);
        assert_eq!(original.llm.model, loaded.llm.model);
        assert_eq!(original.llm.top_k, loaded.llm.top_k);
        assert_eq!(original.stt.model, loaded.stt.model);
        assert_eq!(original.stt.min_audio_bytes, loaded.stt.min_audio_bytes);
        assert_eq!(original.translate.base_url, loaded.translate.base_url);
        assert_eq!(original.tts.slow, loaded.tts.slow);
        assert_eq!(original.playback.command, loaded.playback.command);
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.session.language, LanguageCode::Hi);
        assert_eq!(config.llm.model, "gemini-1.5-flash-latest");
    }

    #[test]
    fn partial_file_fills_remaining_sections_with_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            "[session]\nlanguage = \"ta\"\nuse_ai = false\nsynthesize = true\n\
             auto_play = false\nresponse_language = \"detected\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).expect("load");
        assert_eq!(config.session.language, LanguageCode::Ta);
        assert!(!config.session.use_ai);
        assert_eq!(config.session.response_language, ResponseLanguage::Detected);
        assert_eq!(config.tts.base_url, "https://translate.google.com");
    }

    #[test]
    fn unsupported_language_keeps_rest_of_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "[session]\nlanguage = \"fr\"\n[llm]\nmodel = \"custom-model\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).expect("load");
        assert_eq!(config.session.language, LanguageCode::En);
        assert_eq!(config.llm.model, "custom-model");
    }

    #[test]
    fn response_language_is_written_lowercase() {
        let mut config = AppConfig::default();
        config.session.response_language = ResponseLanguage::Detected;
        let text = toml::to_string_pretty(&config).expect("serialize");
        assert!(text.contains("response_language = \"detected\""), "{text}");
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();
        assert!(cfg.session.use_ai);
        assert!(cfg.session.auto_play);
        assert_eq!(cfg.session.response_language, ResponseLanguage::Requested);
        assert!(cfg.llm.api_key.is_none());
        assert!((cfg.llm.temperature - 1.0).abs() < f32::EPSILON);
        assert_eq!(cfg.llm.max_output_tokens, 8192);
        assert_eq!(cfg.stt.min_audio_bytes, 1000);
        assert!(cfg.playback.command.is_none());
    }

    #[test]
    fn env_key_takes_precedence_over_config() {
        let key = LlmConfig::resolve_with(
            |name| (name == "GOOGLE_API_KEY").then(|| "from-env".to_string()),
            Some("from-file"),
        );
        assert_eq!(key.as_deref(), Some("from-env"));
    }

    #[test]
    fn gemini_key_checked_before_google_key() {
        let key = LlmConfig::resolve_with(|name| Some(format!("{name}-value")), None);
        assert_eq!(key.as_deref(), Some("GEMINI_API_KEY-value"));
    }

    #[test]
    fn blank_keys_count_as_missing() {
        let key = LlmConfig::resolve_with(|_| Some("  ".to_string()), Some(""));
        assert_eq!(key, None);
        let key = LlmConfig::resolve_with(|_| None, Some("file-key"));
        assert_eq!(key.as_deref(), Some("file-key"));
    }
}
