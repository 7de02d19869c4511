//! Single-slot audio playback.
//!
//! At most one clip is active at a time: [`Playback::start`] stops and
//! releases the current clip before taking the new one.  [`TempFilePlayer`]
//! stages each clip in a scoped temporary file (deleted when the clip is
//! released) and, when a player command is configured (e.g. `mpv --no-video`),
//! spawns it on that file.  Without a command the staged file is simply kept
//! available for the host to play.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::audio::AudioClip;

// ---------------------------------------------------------------------------
// PlaybackError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The clip could not be staged on disk.
    #[error("cannot stage audio for playback: {0}")]
    Stage(#[from] std::io::Error),

    /// The configured player command could not be started.
    #[error("cannot start audio player {command:?}: {message}")]
    Player { command: String, message: String },
}

// ---------------------------------------------------------------------------
// Playback trait
// ---------------------------------------------------------------------------

/// A single-slot audio sink.
pub trait Playback: Send {
    /// Stop any active clip, then start `clip`.  Returns the staged file.
    fn start(&mut self, clip: &AudioClip) -> Result<PathBuf, PlaybackError>;

    /// Stop and release the active clip.  No-op when idle.
    fn stop(&mut self);

    /// Whether a clip is currently held.
    fn is_active(&self) -> bool;
}

// ---------------------------------------------------------------------------
// TempFilePlayer
// ---------------------------------------------------------------------------

struct ActiveClip {
    file: NamedTempFile,
    player: Option<Child>,
}

/// Stages clips in temporary files and optionally hands them to an external
/// player process.
pub struct TempFilePlayer {
    command: Option<String>,
    active: Option<ActiveClip>,
}

impl TempFilePlayer {
    /// `command` is a program plus optional arguments; the staged file path
    /// is appended as the last argument.
    pub fn new(command: Option<String>) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
            active: None,
        }
    }

    /// Path of the staged file for the active clip, if any.
    pub fn active_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|a| a.file.path())
    }

    fn spawn_player(&self, path: &Path) -> Result<Option<Child>, PlaybackError> {
        let Some(command) = self.command.as_deref() else {
            return Ok(None);
        };
        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            return Ok(None);
        };

        Command::new(program)
            .args(parts)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(Some)
            .map_err(|e| PlaybackError::Player {
                command: command.to_string(),
                message: e.to_string(),
            })
    }
}

impl Playback for TempFilePlayer {
    fn start(&mut self, clip: &AudioClip) -> Result<PathBuf, PlaybackError> {
        self.stop();

        let mut file = tempfile::Builder::new()
            .prefix("agri-voice-")
            .suffix(&format!(".{}", clip.encoding.extension()))
            .tempfile()?;
        file.write_all(&clip.bytes)?;
        file.flush()?;

        let path = file.path().to_path_buf();
        let player = self.spawn_player(&path)?;
        log::debug!("playback: staged {} bytes at {}", clip.len(), path.display());

        self.active = Some(ActiveClip { file, player });
        Ok(path)
    }

    fn stop(&mut self) {
        if let Some(mut active) = self.active.take() {
            if let Some(child) = active.player.as_mut() {
                // The player may already have exited on its own.
                let _ = child.kill();
                let _ = child.wait();
            }
            log::debug!("playback: released {}", active.file.path().display());
            // Dropping `file` deletes the staged clip.
        }
    }

    fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

impl Drop for TempFilePlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
