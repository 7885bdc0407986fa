//! Key-value substrate abstraction.
//!
//! A [`KeyValueStore`] maps opaque string keys to serialized JSON documents.
//! It knows nothing about entities; [`PersistedStore`](super::PersistedStore)
//! layers typed, fail-soft access on top.

use haru_core::HaruError;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Errors that can occur in the key-value substrate.
#[derive(Debug)]
pub enum KeyValueError {
    /// File I/O error.
    IoError(std::io::Error),
    /// File locking error.
    LockError(String),
    /// Key contains characters that cannot name a document.
    InvalidKey(String),
    /// Writing would exceed the substrate's capacity.
    QuotaExceeded { key: String, limit: usize },
}

impl std::fmt::Display for KeyValueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyValueError::IoError(e) => write!(f, "I/O error: {}", e),
            KeyValueError::LockError(e) => write!(f, "Lock error: {}", e),
            KeyValueError::InvalidKey(key) => write!(f, "Invalid storage key: {:?}", key),
            KeyValueError::QuotaExceeded { key, limit } => {
                write!(f, "Quota of {} bytes exceeded while writing {:?}", limit, key)
            }
        }
    }
}

impl std::error::Error for KeyValueError {}

impl From<std::io::Error> for KeyValueError {
    fn from(e: std::io::Error) -> Self {
        KeyValueError::IoError(e)
    }
}

impl From<KeyValueError> for HaruError {
    fn from(e: KeyValueError) -> Self {
        match e {
            KeyValueError::IoError(io) => HaruError::from(io),
            other => HaruError::storage(other.to_string()),
        }
    }
}

/// Transaction callback: receives the current document (if any) and returns
/// the document to write, or `None` to leave the key untouched.
pub type UpdateFn<'a> = dyn FnMut(Option<String>) -> Option<String> + 'a;

/// Durable key → document storage with all-or-nothing per-key writes.
pub trait KeyValueStore: Send + Sync {
    /// Reads the document stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueError>;

    /// Replaces the document stored under `key`.
    fn put(&self, key: &str, value: &str) -> Result<(), KeyValueError>;

    /// Deletes `key`; deleting a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), KeyValueError>;

    /// Lists stored keys in sorted order.
    fn keys(&self) -> Result<Vec<String>, KeyValueError>;

    /// Read-modify-write of one key under an exclusive lock.
    fn update(&self, key: &str, f: &mut UpdateFn<'_>) -> Result<(), KeyValueError>;
}

/// Validates a storage key.
///
/// Keys become file names, so only ASCII alphanumerics, `_`, `-` and `.`
/// are accepted, and the key may not start with `.`.
pub fn validate_key(key: &str) -> Result<(), KeyValueError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(KeyValueError::InvalidKey(key.to_string()))
    }
}

/// In-memory substrate.
///
/// Used for tests and ephemeral sessions. An optional quota on the total
/// stored bytes simulates a full storage medium.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    documents: Mutex<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the total size of all stored documents.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            documents: Mutex::new(BTreeMap::new()),
            quota: Some(limit),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, KeyValueError> {
        self.documents
            .lock()
            .map_err(|e| KeyValueError::LockError(format!("memory store poisoned: {}", e)))
    }

    fn check_quota(
        &self,
        documents: &BTreeMap<String, String>,
        key: &str,
        value: &str,
    ) -> Result<(), KeyValueError> {
        let Some(limit) = self.quota else {
            return Ok(());
        };
        let others: usize = documents
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(_, v)| v.len())
            .sum();
        if others + value.len() > limit {
            return Err(KeyValueError::QuotaExceeded {
                key: key.to_string(),
                limit,
            });
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueError> {
        validate_key(key)?;
        Ok(self.lock()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), KeyValueError> {
        validate_key(key)?;
        let mut documents = self.lock()?;
        self.check_quota(&documents, key, value)?;
        documents.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueError> {
        validate_key(key)?;
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, KeyValueError> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    fn update(&self, key: &str, f: &mut UpdateFn<'_>) -> Result<(), KeyValueError> {
        validate_key(key)?;
        let mut documents = self.lock()?;
        let current = documents.get(key).cloned();
        if let Some(next) = f(current) {
            self.check_quota(&documents, key, &next)?;
            documents.insert(key.to_string(), next);
        }
        Ok(())
    }
}
