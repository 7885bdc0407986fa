//! Error types for the Haru application.

use thiserror::Error;

/// A shared error type for the entire Haru workspace.
///
/// Only failures that must reach the caller end up here. Soft failures
/// (corrupt persisted JSON, unknown mutation targets, a failing transport)
/// are absorbed by the component that sees them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HaruError {
    #[error("Entity not found: {entity} '{id}'")]
    NotFound { entity: &'static str, id: String },

    /// File system failure outside the key-value substrate
    #[error("IO error: {0}")]
    Io(String),

    /// Substrate failure: locking, quota, atomic rename
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{format} encoding error: {message}")]
    Serialization {
        format: &'static str,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before it reached storage
    #[error("Validation error: {0}")]
    Validation(String),

    /// A generation failure that escaped the transport chain
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HaruError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    fn encoding(format: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Serialization {
            format,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for HaruError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(format!("{err} ({:?})", err.kind()))
    }
}

impl From<serde_json::Error> for HaruError {
    fn from(err: serde_json::Error) -> Self {
        Self::encoding("JSON", err)
    }
}

impl From<toml::de::Error> for HaruError {
    fn from(err: toml::de::Error) -> Self {
        Self::encoding("TOML", err)
    }
}

impl From<toml::ser::Error> for HaruError {
    fn from(err: toml::ser::Error) -> Self {
        Self::encoding("TOML", err)
    }
}

impl From<crate::generation::GenerationError> for HaruError {
    fn from(err: crate::generation::GenerationError) -> Self {
        Self::Generation(err.to_string())
    }
}

/// A type alias for `Result<T, HaruError>`.
pub type Result<T> = std::result::Result<T, HaruError>;
