use anyhow::{Context, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Key-value persistence for whole JSON documents. One document per key;
/// every write replaces the previous document.
pub trait Storage {
    /// Returns the stored document, or `None` when the key has never been
    /// written (first run).
    fn load(&self, key: &str) -> Result<Option<String>>;

    fn save(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for std::rc::Rc<S> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }
}

/// File-backed storage: each key lives in `<dir>/<key>.json`.
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Storage rooted at the user data directory (or the current directory
    /// when no home can be resolved).
    pub fn open() -> Self {
        Self { dir: Self::default_dir() }
    }

    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn default_dir() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobtrail") {
            proj_dirs.data_dir().to_path_buf()
        } else {
            PathBuf::from(".jobtrail")
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for JsonFileStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory {}", self.dir.display()))?;
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// In-memory storage. Backs tests and throwaway stores; nothing survives the
/// process.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated storage, for exercising the load path.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        storage
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::with_dir(dir.path().to_path_buf());
        assert_eq!(storage.load("applications").unwrap(), None);
    }

    #[test]
    fn test_save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::with_dir(dir.path().join("nested"));
        storage.save("applications", "[]").unwrap();
        assert_eq!(storage.load("applications").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_save_replaces_whole_document() {
        let storage = MemoryStorage::new();
        storage.save("notes", "[1]").unwrap();
        storage.save("notes", "[2]").unwrap();
        assert_eq!(storage.load("notes").unwrap().as_deref(), Some("[2]"));
    }
}
