//! Configuration service implementation.
//!
//! Loads `config.toml` and `secret.json` from the haru config directory and
//! resolves the effective settings (data directory, Gemini credentials).
//!
//! Unlike stored data, configuration is not fail-soft: a missing file means
//! defaults, but a file that exists and does not parse is an error.

use crate::paths::HaruPaths;
use haru_core::config::{GeminiSecret, HaruConfig, SecretConfig};
use haru_core::{HaruError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Environment variables consulted for the Gemini API key, in order.
pub const GEMINI_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Resolved Gemini credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiCredentials {
    pub api_key: String,
    pub model: String,
}

/// Loads and caches the configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: HaruPaths,
    config_file: Option<PathBuf>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<HaruConfig>>>,
}

impl ConfigService {
    /// Uses the platform config directory, or `config_dir` if given.
    pub fn new(config_dir: Option<&Path>) -> Self {
        Self {
            paths: HaruPaths::new(config_dir),
            config_file: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Reads `config.toml` from an explicit path instead.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn paths(&self) -> &HaruPaths {
        &self.paths
    }

    /// Gets the configuration, loading it on first access.
    pub fn get_config(&self) -> Result<HaruConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|e| HaruError::internal(format!("config cache poisoned: {}", e)))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        {
            let mut write_lock = self
                .config
                .write()
                .map_err(|e| HaruError::internal(format!("config cache poisoned: {}", e)))?;
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    fn load_config(&self) -> Result<HaruConfig> {
        let path = match &self.config_file {
            Some(path) => path.clone(),
            None => self.paths.config_file()?,
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file; using defaults");
            return Ok(HaruConfig::default());
        }

        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| {
            HaruError::config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Loads `secret.json`; a missing file means no secrets.
    pub fn load_secrets(&self) -> Result<SecretConfig> {
        let path = self.paths.secret_file()?;
        if !path.exists() {
            return Ok(SecretConfig::default());
        }

        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| {
            HaruError::config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Directory holding the storage documents.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let config = self.get_config()?;
        match config.storage.data_dir {
            Some(dir) => Ok(dir),
            None => Ok(self.paths.data_dir()?),
        }
    }

    /// Gemini credentials from the process environment or `secret.json`.
    pub fn gemini_credentials(&self) -> Result<Option<GeminiCredentials>> {
        let config = self.get_config()?;
        let secrets = self.load_secrets()?;
        Ok(resolve_gemini_credentials(
            &config,
            secrets.gemini.as_ref(),
            |name| std::env::var(name).ok(),
        ))
    }
}

/// Picks the Gemini API key: environment first, then `secret.json`.
///
/// Blank keys count as absent. The model comes from the secret file if it
/// names one, else from `[generation] model`.
pub fn resolve_gemini_credentials(
    config: &HaruConfig,
    secret: Option<&GeminiSecret>,
    env: impl Fn(&str) -> Option<String>,
) -> Option<GeminiCredentials> {
    let from_env = GEMINI_KEY_ENV_VARS
        .iter()
        .filter_map(|name| env(name))
        .find(|key| !key.trim().is_empty());

    let api_key = from_env.or_else(|| {
        secret
            .map(|s| s.api_key.clone())
            .filter(|key| !key.trim().is_empty())
    })?;

    let model = secret
        .and_then(|s| s.model_name.clone())
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| config.generation.model.clone());

    Some(GeminiCredentials {
        api_key: api_key.trim().to_string(),
        model,
    })
}
