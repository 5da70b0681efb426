//! Typed get/set over a string-keyed persistence medium.
//!
//! The [`Store`] is the only component that touches persistence. Reads fall
//! back to a caller-supplied default on absence *or* corruption, and writes
//! never raise: a failed write means the preference silently does not stick,
//! which is the documented degraded mode for a full or read-only disk.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use directories_next::BaseDirs;
use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// The raw persistence medium: string keys to string values. Implementations
/// must treat `read` returning `None` as "key never written".
pub trait Backend {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, raw: &str) -> Result<(), StorageError>;
    fn contains(&self, key: &str) -> bool;
}

/// One `<key>.json` file per key under a data directory.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Platform config dir (e.g. `~/.config/Tabula` on Linux), if the home
    /// directory can be determined at all.
    pub fn default_dir() -> Option<PathBuf> {
        BaseDirs::new().map(|base| base.config_dir().join("Tabula"))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Backend for FileBackend {
    fn read(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn write(&mut self, key: &str, raw: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), raw)?;
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }
}

/// In-memory backend for tests and the `--in-memory` terminal mode.
#[derive(Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plants a raw (possibly non-JSON) value, bypassing serialization.
    pub fn insert_raw(&mut self, key: &str, raw: &str) {
        self.entries.insert(key.to_string(), raw.to_string());
    }
}

impl Backend for MemoryBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, raw: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

pub struct Store {
    backend: Box<dyn Backend>,
}

impl Store {
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::new()))
    }

    /// Absent key, unreadable value and failed deserialization are all the
    /// same case: the fallback wins, nothing raises.
    pub fn get<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let Some(raw) = self.backend.read(key) else {
            return fallback;
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!("Ignoring corrupt value for `{}`: {}", key, err);
                fallback
            }
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) {
        let raw = match serde_json::to_string_pretty(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Failed to serialize value for `{}`: {}", key, err);
                return;
            }
        };

        if let Err(err) = self.backend.write(key, &raw) {
            warn!("Failed to persist `{}`: {}", key, err);
        }
    }

    /// Presence-of-key, not truthiness-of-value. An explicitly stored empty
    /// list still counts as present.
    pub fn contains(&self, key: &str) -> bool {
        self.backend.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reads like an empty store; every write fails.
    struct BrokenBackend;

    impl Backend for BrokenBackend {
        fn read(&self, _key: &str) -> Option<String> {
            None
        }

        fn write(&mut self, _key: &str, _raw: &str) -> Result<(), StorageError> {
            Err(StorageError::Write(std::io::Error::other("disk full")))
        }

        fn contains(&self, _key: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_get_returns_fallback_when_absent() {
        let store = Store::in_memory();
        assert_eq!(store.get("nope", 42u32), 42);
    }

    #[test]
    fn test_get_returns_fallback_on_corrupt_value() {
        let mut backend = MemoryBackend::new();
        backend.insert_raw("weird", "{not json at all");
        let store = Store::new(Box::new(backend));
        assert_eq!(store.get("weird", "fallback".to_string()), "fallback");
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let mut store = Store::in_memory();
        store.set("answer", &vec![1u8, 2, 3]);
        assert_eq!(store.get("answer", Vec::<u8>::new()), vec![1, 2, 3]);
    }

    #[test]
    fn test_contains_distinguishes_empty_from_absent() {
        let mut store = Store::in_memory();
        assert!(!store.contains("list"));
        store.set("list", &Vec::<u8>::new());
        assert!(store.contains("list"));
    }

    #[test]
    fn test_set_swallows_write_failure() {
        let mut store = Store::new(Box::new(BrokenBackend));

        // The preference silently does not stick.
        store.set("theme", &"light");
        assert_eq!(store.get("theme", "dark".to_string()), "dark");
        assert!(!store.contains("theme"));
    }

    #[test]
    fn test_file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store =
            Store::new(Box::new(FileBackend::new(dir.path().join("state"))));
        store.set("theme", &"dark");
        assert_eq!(store.get("theme", String::new()), "dark");
        assert!(store.contains("theme"));
        assert!(!store.contains("pins"));
    }
}
