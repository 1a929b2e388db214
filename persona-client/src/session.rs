//! Session persistence
//!
//! The session is a single optional email stored under one reserved key of
//! an origin-scoped key-value storage, so it survives restarts.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use crate::error::SessionError;

/// Storage key holding the verified email
pub const SESSION_KEY: &str = "persona.email";

pub type StoreResult<T> = Result<T, SessionError>;

/// Durable key-value storage scoped to one relying party
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Storage that lives as long as the process
#[derive(Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.read().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.values
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.values.write().unwrap().remove(key);
        Ok(())
    }
}

/// Storage backed by a JSON object in a file
///
/// Every write rewrites the whole file. A missing file reads as empty; an
/// unreadable one is reset by the next `remove`.
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> StoreResult<()> {
        let contents = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let _guard = self.lock.lock().unwrap();
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let _guard = self.lock.lock().unwrap();
        let mut values = match self.load() {
            Ok(values) => values,
            // Nothing readable is left to keep; start over empty
            Err(SessionError::Json(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Resetting unreadable storage file");
                return self.save(&BTreeMap::new());
            }
            Err(e) => return Err(e),
        };
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}

/// The signed-in email, persisted with an in-memory copy
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    cached: RwLock<Option<String>>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            cached: RwLock::new(None),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// The persisted email, else the in-memory copy
    pub fn get(&self) -> Option<String> {
        match self.storage.get(SESSION_KEY) {
            Ok(Some(email)) => Some(email),
            Ok(None) => self.cached.read().unwrap().clone(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted session");
                self.cached.read().unwrap().clone()
            }
        }
    }

    pub fn set(&self, email: &str) -> StoreResult<()> {
        self.storage.set(SESSION_KEY, email)?;
        *self.cached.write().unwrap() = Some(email.to_string());
        Ok(())
    }

    pub fn clear(&self) -> StoreResult<()> {
        *self.cached.write().unwrap() = None;
        self.storage.remove(SESSION_KEY)
    }
}
