//! Key-value backends for persisted state.

use crate::persistence::error::StorageError;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// A durable string-to-string store.
///
/// Implementations decide how values survive restarts. A `set` replaces
/// any previous value under the same key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for &K {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// In-memory store. Clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.lock().insert(key.into(), value.into());
        store
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-per-key store rooted at a directory.
///
/// Writes land in a temporary file that is then renamed over the target,
/// so a reader never sees a half-written value.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_name_for(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let io_err = |source: io::Error| StorageError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;

        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value).map_err(io_err)?;
        fs::rename(&temp_path, &path).map_err(io_err)?;
        Ok(())
    }
}

/// Map a key onto a portable file name.
///
/// `[A-Za-z0-9.-]` pass through; every other byte, `_` included, becomes
/// `_XX` (uppercase hex). The mapping is injective, so distinct keys never
/// share a file.
fn file_name_for(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-') {
            name.push(char::from(byte));
        } else {
            name.push_str(&format!("_{byte:02X}"));
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_overwrites() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(handle.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn file_names_are_escaped() {
        assert_eq!(
            file_name_for("@timer:cycles-state-1.0.0"),
            "_40timer_3Acycles-state-1.0.0"
        );
        assert_eq!(file_name_for("a_b"), "a_5Fb");
    }

    #[test]
    fn lookalike_keys_use_distinct_files() {
        assert_ne!(file_name_for("@timer:x"), file_name_for("_timer_x"));

        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("@timer:x", "first").unwrap();
        store.set("_timer_x", "second").unwrap();

        assert_eq!(store.get("@timer:x").unwrap().as_deref(), Some("first"));
        assert_eq!(store.get("_timer_x").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn file_store_round_trips_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get("@timer:state").unwrap(), None);

        store.set("@timer:state", "first").unwrap();
        store.set("@timer:state", "second").unwrap();

        assert_eq!(store.get("@timer:state").unwrap().as_deref(), Some("second"));
        assert!(store.path_for("@timer:state").exists());
        assert!(!store.path_for("@timer:state").with_extension("json.tmp").exists());
    }

    #[test]
    fn file_store_reports_unreadable_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        fs::create_dir_all(store.path_for("k")).unwrap();

        let err = store.get("k").unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
