//! Typed, fail-soft access to the key-value substrate.

use super::dir_store::DirKeyValueStore;
use super::key_value::{KeyValueStore, MemoryKeyValueStore};
use haru_core::{HaruError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::path::PathBuf;
use std::sync::Arc;

/// Durable key → JSON document storage.
///
/// Reads fail soft: a missing key, an unreadable substrate or a document that
/// does not deserialize all read as "nothing stored", and the caller
/// substitutes its own default. Writes serialize and commit synchronously and
/// propagate every failure.
///
/// One logical collection lives under one key; there are no partial-key
/// writes.
#[derive(Clone)]
pub struct PersistedStore {
    backend: Arc<dyn KeyValueStore>,
}

impl PersistedStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKeyValueStore::new()))
    }

    /// A store persisted as JSON files under `data_dir`.
    pub fn open_dir(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let backend = DirKeyValueStore::open(data_dir)?;
        Ok(Self::new(Arc::new(backend)))
    }

    /// Reads the raw document under `key`.
    pub fn read_raw(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read storage key; treating as empty");
                None
            }
        }
    }

    /// Reads the document under `key` as untyped JSON.
    pub fn read_value(&self, key: &str) -> Option<JsonValue> {
        self.read_raw(key).and_then(|raw| parse_document(key, &raw))
    }

    /// Reads and deserializes the document under `key`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.read_value(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored document has an unexpected shape; using default");
                None
            }
        }
    }

    /// Reads `key`, substituting `default` for anything unreadable.
    pub fn read_or<T: DeserializeOwned>(&self, key: &str, default: impl FnOnce() -> T) -> T {
        self.read(key).unwrap_or_else(default)
    }

    /// Serializes `value` and commits it under `key`.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let document = serde_json::to_string(value)?;
        self.write_raw(key, &document)
    }

    /// Commits an already-serialized document.
    pub fn write_raw(&self, key: &str, document: &str) -> Result<()> {
        tracing::debug!(key, bytes = document.len(), "Writing storage key");
        self.backend.put(key, document)?;
        Ok(())
    }

    /// Deletes the document under `key`.
    pub fn remove(&self, key: &str) -> Result<()> {
        self.backend.remove(key)?;
        Ok(())
    }

    /// Keys currently holding a document.
    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(self.backend.keys()?)
    }

    /// Read-modify-write of one key under the substrate's lock.
    ///
    /// `f` receives the current document (fail-soft parsed, `None` if missing
    /// or corrupt) and returns the document to store plus a result for the
    /// caller. If `f` fails nothing is written.
    pub fn modify_value<R>(
        &self,
        key: &str,
        f: impl FnOnce(Option<JsonValue>) -> Result<(JsonValue, R)>,
    ) -> Result<R> {
        let mut pending = Some(f);
        let mut outcome: Option<Result<R>> = None;

        self.backend.update(key, &mut |raw| {
            let f = pending.take()?;
            let current = raw.as_deref().and_then(|text| parse_document(key, text));
            let produced = f(current).and_then(|(value, result)| {
                let document = serde_json::to_string(&value)?;
                Ok((document, result))
            });
            match produced {
                Ok((document, result)) => {
                    tracing::debug!(key, bytes = document.len(), "Writing storage key");
                    outcome = Some(Ok(result));
                    Some(document)
                }
                Err(e) => {
                    outcome = Some(Err(e));
                    None
                }
            }
        })?;

        outcome.unwrap_or_else(|| Err(HaruError::internal("storage update callback was not invoked")))
    }
}

fn parse_document(key: &str, raw: &str) -> Option<JsonValue> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Corrupt JSON under storage key; using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
    }

    #[test]
    fn test_read_missing_uses_default() {
        let store = PersistedStore::in_memory();
        let counter = store.read_or("counter", || Counter { count: 7 });
        assert_eq!(counter, Counter { count: 7 });
    }

    #[test]
    fn test_read_corrupt_uses_default() {
        let store = PersistedStore::in_memory();
        store.write_raw("counter", "{not json").unwrap();
        assert_eq!(store.read::<Counter>("counter"), None);

        store.write_raw("counter", "[1,2]").unwrap();
        assert_eq!(store.read::<Counter>("counter"), None);
    }

    #[test]
    fn test_write_then_read() {
        let store = PersistedStore::in_memory();
        store.write("counter", &Counter { count: 1 }).unwrap();
        assert_eq!(store.read::<Counter>("counter"), Some(Counter { count: 1 }));
    }

    #[test]
    fn test_write_failure_propagates() {
        let store = PersistedStore::new(Arc::new(MemoryKeyValueStore::with_quota(4)));
        let err = store.write("counter", &Counter { count: 1 }).unwrap_err();
        assert!(matches!(err, HaruError::Storage(_)));
        assert_eq!(store.read_raw("counter"), None);
    }

    #[test]
    fn test_modify_value_error_writes_nothing() {
        let store = PersistedStore::in_memory();
        store.write("counter", &Counter { count: 1 }).unwrap();

        let result: Result<()> =
            store.modify_value("counter", |_| Err(HaruError::validation("nope")));
        assert!(result.is_err());
        assert_eq!(store.read::<Counter>("counter"), Some(Counter { count: 1 }));
    }

    #[test]
    fn test_modify_value_returns_result() {
        let store = PersistedStore::in_memory();
        let seen = store
            .modify_value("counter", |current| {
                assert!(current.is_none());
                Ok((serde_json::json!({ "count": 2 }), "done"))
            })
            .unwrap();
        assert_eq!(seen, "done");
        assert_eq!(store.read::<Counter>("counter"), Some(Counter { count: 2 }));
    }
}
