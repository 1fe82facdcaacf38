//! Key-value storage backends for the record store.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use dirs_next as dirs;

/// Text storage keyed by a fixed string.
///
/// `load` returns `Ok(None)` when nothing has been saved under `key` yet.
pub trait KeyValueStore {
    fn load(&self, key: &str) -> io::Result<Option<String>>;
    fn save(&mut self, key: &str, text: &str) -> io::Result<()>;
}

/// In-memory backend for tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `save` fail, for exercising error paths.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn with_value(key: &str, text: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), text.to_string());
        Self {
            values,
            read_only: false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, text: &str) -> io::Result<()> {
        if self.read_only {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "storage is read-only",
            ));
        }
        self.values.insert(key.to_string(), text.to_string());
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    const APP_DIR: &'static str = "workout_tracker";

    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Platform data directory, e.g. `~/.local/share/workout_tracker`.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join(Self::APP_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&mut self, key: &str, text: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        // saved data is only replaced by a fully written file
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, text)?;
        std::fs::rename(&tmp, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load("workouts").unwrap(), None);
        store.save("workouts", "[]").unwrap();
        assert_eq!(store.load("workouts").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn read_only_store_rejects_writes() {
        let mut store = MemoryStore::new();
        store.set_read_only(true);
        let err = store.save("workouts", "[]").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(store.get("workouts").is_none());
    }

    #[test]
    fn file_store_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.load("workouts").unwrap(), None);
    }

    #[test]
    fn file_store_creates_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        store.save("workouts", "[1]").unwrap();
        store.save("workouts", "[2]").unwrap();
        assert_eq!(store.load("workouts").unwrap().as_deref(), Some("[2]"));
        assert!(store.dir().join("workouts.json").exists());
        assert!(!store.dir().join("workouts.json.tmp").exists());
    }
}
