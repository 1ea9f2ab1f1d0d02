//! Small per-device key/value storage, the stand-in for browser local storage.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};

/// Legacy settings blob. Nothing in the client reads it any more, but it is
/// still cleared whenever the identity goes away so stale data from older
/// releases does not linger.
pub const SETTINGS_KEY: &str = "spark_settings";

pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// JSON object on disk, rewritten on every change.
pub struct FileLocalStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileLocalStore {
    pub fn open(path: PathBuf) -> Self {
        Self { path, lock: Mutex::new(()) }
    }

    fn read(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

impl LocalStore for FileLocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| anyhow::anyhow!("local store lock poisoned"))?;
        Ok(self.read()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| anyhow::anyhow!("local store lock poisoned"))?;
        let mut entries = self.read()?;
        entries.insert(key.to_string(), value.to_string());
        self.write(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| anyhow::anyhow!("local store lock poisoned"))?;
        let mut entries = self.read()?;
        if entries.remove(key).is_some() {
            self.write(&entries)?;
        }
        Ok(())
    }
}

/// Clear the settings blob, logging instead of failing.
pub fn clear_settings(local: &dyn LocalStore) {
    if let Err(e) = local.remove(SETTINGS_KEY) {
        tracing::warn!("Could not clear {SETTINGS_KEY}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = FileLocalStore::open(tmp.path().join("local_storage.json"));
        assert_eq!(store.get(SETTINGS_KEY).unwrap(), None);

        store.set(SETTINGS_KEY, r#"{"theme":"dark"}"#).unwrap();
        store.set("other", "1").unwrap();
        assert_eq!(store.get(SETTINGS_KEY).unwrap().as_deref(), Some(r#"{"theme":"dark"}"#));

        clear_settings(&store);
        assert_eq!(store.get(SETTINGS_KEY).unwrap(), None);
        assert_eq!(store.get("other").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_remove_missing_file_is_ok() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = FileLocalStore::open(tmp.path().join("absent.json"));
        store.remove(SETTINGS_KEY).unwrap();
        assert!(!tmp.path().join("absent.json").exists());
    }
}
