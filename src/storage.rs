//! Small key/value stores for the session token and the theme preference
//!
//! Two lifecycles exist: the session store holds the bearer token until
//! logout, the durable store holds preferences indefinitely. Both are plain
//! JSON objects on disk, in the same spirit as the config file.

use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StorageError;

/// Key under which the session token is stored
pub const TOKEN_KEY: &str = "z01_token";
/// Key under which the theme preference is stored
pub const THEME_KEY: &str = "z01_theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreScope {
    /// Lives until logout
    Session,
    /// Survives logout
    Durable,
}

impl StoreScope {
    fn file_name(self) -> &'static str {
        match self {
            StoreScope::Session => "session.json",
            StoreScope::Durable => "preferences.json",
        }
    }
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Boxed store, for callers choosing the backend at runtime
pub type DynStore = Box<dyn KeyValueStore + Send + Sync>;

/// In-memory store, used by tests and when no directory is available
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
        Ok(())
    }
}

/// JSON-object file store; every call reads or rewrites the whole file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    /// Store for `scope` inside the platform's per-user directories
    pub fn for_scope(scope: StoreScope) -> Result<Self, StorageError> {
        let dirs = ProjectDirs::from("com", "xpboard", "xpboard").ok_or(StorageError::NoDirectory)?;
        let dir = match scope {
            StoreScope::Session => dirs.data_local_dir().to_path_buf(),
            StoreScope::Durable => dirs.config_dir().to_path_buf(),
        };
        Ok(Self::at(dir.join(scope.file_name())))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let data = fs::read_to_string(&self.path).map_err(|e| self.read_error(e))?;
        if data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&data).map_err(|e| self.read_error(e))
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }
        let data = serde_json::to_string_pretty(entries).map_err(|e| self.write_error(e))?;
        fs::write(&self.path, data).map_err(|e| self.write_error(e))
    }

    fn read_error(&self, reason: impl ToString) -> StorageError {
        StorageError::ReadFailed {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    fn write_error(&self, reason: impl ToString) -> StorageError {
        StorageError::WriteFailed {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}
