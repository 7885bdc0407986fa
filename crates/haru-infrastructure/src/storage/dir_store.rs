//! Directory-backed key-value substrate with atomic writes.
//!
//! Each key is one `<key>.json` document inside a base directory.

use super::key_value::{KeyValueError, KeyValueStore, UpdateFn, validate_key};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

const DOCUMENT_EXTENSION: &str = "json";

/// A directory of JSON documents, one per key.
///
/// Provides:
/// - **Atomicity**: Writes are all-or-nothing via tmp file + atomic rename
/// - **Isolation**: `update` holds an exclusive file lock across read and write
/// - **Durability**: Explicit fsync before rename
#[derive(Debug, Clone)]
pub struct DirKeyValueStore {
    base_dir: PathBuf,
}

impl DirKeyValueStore {
    /// Opens (and creates if needed) the store directory.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self, KeyValueError> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn document_path(&self, key: &str) -> Result<PathBuf, KeyValueError> {
        validate_key(key)?;
        Ok(self.base_dir.join(format!("{}.{}", key, DOCUMENT_EXTENSION)))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!(".{}.{}.tmp", key, DOCUMENT_EXTENSION))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!(".{}.lock", key))
    }

    fn read_document(path: &Path) -> Result<Option<String>, KeyValueError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(content))
    }

    fn write_document(&self, key: &str, path: &Path, value: &str) -> Result<(), KeyValueError> {
        // Write to temporary file in the same directory
        let tmp_path = self.temp_path(key);
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(value.as_bytes())?;

        // Ensure data is written to disk
        tmp_file.sync_all()?;
        drop(tmp_file);

        // Atomic rename
        fs::rename(&tmp_path, path)?;

        Ok(())
    }

    fn acquire_lock(&self, key: &str) -> Result<FileLock, KeyValueError> {
        FileLock::acquire(&self.lock_path(key))
    }
}

impl KeyValueStore for DirKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueError> {
        let path = self.document_path(key)?;
        Self::read_document(&path)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), KeyValueError> {
        let path = self.document_path(key)?;
        let _lock = self.acquire_lock(key)?;
        self.write_document(key, &path, value)
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueError> {
        let path = self.document_path(key)?;
        let _lock = self.acquire_lock(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, KeyValueError> {
        let mut keys = Vec::new();
        for item in fs::read_dir(&self.base_dir)? {
            let path = item?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                if validate_key(stem).is_ok() {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn update(&self, key: &str, f: &mut UpdateFn<'_>) -> Result<(), KeyValueError> {
        let path = self.document_path(key)?;

        // Acquire exclusive lock
        let _lock = self.acquire_lock(key)?;

        // Load current data
        let current = Self::read_document(&path)?;

        // Apply update function; save atomically if it produced a document
        if let Some(next) = f(current) {
            self.write_document(key, &path, &next)?;
        }

        Ok(())
    }
}

/// A file lock guard; the lock is released when the handle is dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    /// Acquires an exclusive lock on the given lock file, creating it.
    fn acquire(lock_path: &Path) -> Result<Self, KeyValueError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)?;

        use fs2::FileExt;
        file.lock_exclusive()
            .map_err(|e| KeyValueError::LockError(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_put_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirKeyValueStore::open(temp_dir.path()).unwrap();

        store.put("entries", "[]").unwrap();

        assert_eq!(store.get("entries").unwrap().as_deref(), Some("[]"));
        assert!(temp_dir.path().join("entries.json").exists());
    }

    #[test]
    fn test_get_missing_or_blank_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirKeyValueStore::open(temp_dir.path()).unwrap();
        assert_eq!(store.get("missing").unwrap(), None);

        fs::write(temp_dir.path().join("blank.json"), "  \n").unwrap();
        assert_eq!(store.get("blank").unwrap(), None);
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirKeyValueStore::open(temp_dir.path()).unwrap();

        store.put("entries", "[1,2,3]").unwrap();

        assert!(!temp_dir.path().join(".entries.json.tmp").exists());
    }

    #[test]
    fn test_keys_skip_lock_and_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirKeyValueStore::open(temp_dir.path()).unwrap();

        store.put("b", "{}").unwrap();
        store.update("a", &mut |_| Some("{}".to_string())).unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "x").unwrap();

        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_update_is_read_modify_write() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirKeyValueStore::open(temp_dir.path()).unwrap();

        for _ in 0..3 {
            store
                .update("counter", &mut |current| {
                    let n: u32 = current.and_then(|c| c.parse().ok()).unwrap_or(0);
                    Some((n + 1).to_string())
                })
                .unwrap();
        }

        assert_eq!(store.get("counter").unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn test_remove_missing_key_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirKeyValueStore::open(temp_dir.path()).unwrap();
        store.remove("nothing").unwrap();
    }

    #[test]
    fn test_invalid_key_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirKeyValueStore::open(temp_dir.path()).unwrap();
        assert!(matches!(
            store.put("../outside", "{}"),
            Err(KeyValueError::InvalidKey(_))
        ));
    }
}
