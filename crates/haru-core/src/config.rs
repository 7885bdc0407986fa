//! Application configuration model.
//!
//! `config.toml` holds non-secret settings; API keys live in `secret.json`.
//! Every section and field has a default so a partial file is valid.

use crate::agent::{DEFAULT_MAX_AGENTS, RegistryPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT_URL: &str = "https://testdesu-beryl.vercel.app/api/generate";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct HaruConfig {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub registry: RegistrySettings,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageSettings {
    /// Directory holding one JSON document per storage key.
    /// `None` resolves to the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    /// Primary transport endpoint; empty disables it.
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    /// Per-request timeout applied by both transports.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Model used by the direct Gemini transport.
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            timeout_secs: default_timeout_secs(),
            model: default_model(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RegistrySettings {
    #[serde(default = "default_max_agents")]
    pub max_agents: usize,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            max_agents: default_max_agents(),
        }
    }
}

impl RegistrySettings {
    pub fn policy(&self) -> RegistryPolicy {
        RegistryPolicy {
            max_agents: self.max_agents.max(1),
        }
    }
}

fn default_endpoint_url() -> String {
    DEFAULT_ENDPOINT_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_max_agents() -> usize {
    DEFAULT_MAX_AGENTS
}

/// Root structure of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiSecret>,
}

/// Gemini API credentials.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GeminiSecret {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: HaruConfig = toml::from_str("[registry]\nmax_agents = 3\n").unwrap();
        assert_eq!(config.registry.max_agents, 3);
        assert_eq!(config.generation.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.generation.model, DEFAULT_GEMINI_MODEL);
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_policy_never_below_one() {
        let settings = RegistrySettings { max_agents: 0 };
        assert_eq!(settings.policy().max_agents, 1);
    }
}
