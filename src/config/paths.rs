//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\agri-voice\
//!   macOS:   ~/Library/Application Support/agri-voice/
//!   Linux:   ~/.config/agri-voice/
//!
//! Data dir (yield-model artifacts):
//!   Windows: %LOCALAPPDATA%\agri-voice\
//!   macOS:   ~/Library/Application Support/agri-voice/
//!   Linux:   ~/.local/share/agri-voice/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory holding `yield-model.json` and `label-encoders.json`.
    pub artifacts_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "agri-voice";

    /// Resolves all paths, falling back to the current directory if the
    /// platform cannot provide a standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        Self {
            settings_file: config_dir.join("settings.toml"),
            config_dir,
            artifacts_dir: data_dir.join("artifacts"),
        }
    }

    pub fn yield_model_file(&self) -> PathBuf {
        self.artifacts_dir.join("yield-model.json")
    }

    pub fn label_encoders_file(&self) -> PathBuf {
        self.artifacts_dir.join("label-encoders.json")
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
