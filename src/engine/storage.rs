use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::model::game_save::Envelope;

pub const DATA_DIR_ENV: &str = "WEDART_DATA_DIR";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serde json: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

/// String key-value persistence, the shape of browser local storage.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// `$WEDART_DATA_DIR`, else `<platform data dir>/wedart`.
    pub fn default_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            return PathBuf::from(dir);
        }
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("wedart");
        path
    }

    fn path(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Reads a versioned record. Missing, corrupt or out-of-date records come
/// back as `None` so the caller starts from its default state.
pub fn load<T: DeserializeOwned>(store: &dyn KvStore, key: &str, version: u32) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("storage: reading {key} failed: {e}");
            return None;
        }
    };

    match serde_json::from_str::<Envelope<T>>(&raw) {
        Ok(env) if env.version == version => Some(env.data),
        Ok(env) => {
            log::warn!(
                "storage: {key} has version {}, expected {version}; using defaults",
                env.version
            );
            None
        }
        Err(e) => {
            log::warn!("storage: {key} is corrupt ({e}); using defaults");
            None
        }
    }
}

pub fn save<T: Serialize>(
    store: &dyn KvStore,
    key: &str,
    version: u32,
    data: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(&Envelope { version, data })?;
    store.set(key, &json)
}

/// Fire-and-forget variant of [`save`]; failures are only logged.
pub fn persist<T: Serialize>(store: &dyn KvStore, key: &str, version: u32, data: &T) {
    if let Err(e) = save(store, key, version, data) {
        log::error!("storage: writing {key} failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_through_envelope() {
        let store = MemoryStore::default();
        save(&store, "k", 3, &vec![1, 2, 3]).unwrap();
        assert_eq!(load::<Vec<i32>>(&store, "k", 3), Some(vec![1, 2, 3]));
    }

    #[test]
    fn version_mismatch_falls_back() {
        let store = MemoryStore::default();
        save(&store, "k", 1, &"old").unwrap();
        assert_eq!(load::<String>(&store, "k", 2), None);
    }

    #[test]
    fn corrupt_record_falls_back() {
        let store = MemoryStore::default();
        store.set("k", "{not json").unwrap();
        assert_eq!(load::<String>(&store, "k", 1), None);
        assert_eq!(load::<String>(&store, "missing", 1), None);
    }

    #[test]
    fn file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("wedart-test-{}", uuid::Uuid::new_v4()));
        let store = FileStore::new(&dir).unwrap();
        assert_eq!(store.get("players.v1").unwrap(), None);
        store.set("players.v1", "[]").unwrap();
        assert_eq!(store.get("players.v1").unwrap().as_deref(), Some("[]"));
        store.remove("players.v1").unwrap();
        store.remove("players.v1").unwrap();
        assert_eq!(store.get("players.v1").unwrap(), None);
        fs::remove_dir_all(dir).ok();
    }
}
