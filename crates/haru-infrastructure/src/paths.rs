//! Unified path management for haru files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/haru/              # Config directory
//! ├── config.toml              # Application configuration
//! └── secret.json              # API keys
//!
//! ~/.local/share/haru/         # Data directory (default storage.data_dir)
//! ├── haru_tweet_entries.json
//! ├── haru_tweet_ai_config_v2.json
//! ├── haru_tweet_messages.json
//! └── haru_tweet_user.json
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "haru";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform directory could not be determined.
    DirNotFound(&'static str),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::DirNotFound(kind) => write!(f, "Cannot find {} directory", kind),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for haru_core::HaruError {
    fn from(e: PathError) -> Self {
        haru_core::HaruError::config(e.to_string())
    }
}

/// Resolves haru's files, honoring an optional config directory override.
#[derive(Debug, Clone, Default)]
pub struct HaruPaths {
    config_dir_override: Option<PathBuf>,
}

impl HaruPaths {
    pub fn new(config_dir_override: Option<&Path>) -> Self {
        Self {
            config_dir_override: config_dir_override.map(Path::to_path_buf),
        }
    }

    /// Returns the haru configuration directory (e.g. `~/.config/haru/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(dir) = &self.config_dir_override {
            return Ok(dir.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DirNotFound("config"))
    }

    /// Returns the default data directory (e.g. `~/.local/share/haru/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DirNotFound("data"))
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600).
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }
}
