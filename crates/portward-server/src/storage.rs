//! Flat-file JSON storage for portward records.
//!
//! Each collection lives in its own file and is rewritten wholesale on
//! every mutation, pretty-printed. There is no partial update and no
//! fsync; callers serialize access through the lock in
//! [`crate::api::AppState`]. Forward ids come from a counter persisted
//! separately from the collections, so an id is never derived from the
//! collection length and never reused after a deletion.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use portward_core::{PortForward, TempUser};

/// File holding the port-forward configs.
pub const FORWARDS_FILE: &str = "port_forwards.json";
/// File holding the temporary users.
pub const TEMP_USERS_FILE: &str = "temp_users.json";
/// File holding persistent counters.
pub const COUNTERS_FILE: &str = "counters.json";

/// Storage errors. Malformed persisted data is fatal for the read that hit
/// it; the store never silently resets a corrupt file.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Counters {
    next_forward_id: u64,
}

impl Default for Counters {
    fn default() -> Self {
        Self { next_forward_id: 1 }
    }
}

/// Store rooted at a data directory.
#[derive(Debug)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Open a store, creating the data directory if needed.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|source| StorageError::Io {
            path: data_dir.clone(),
            source,
        })?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn load_forwards(&self) -> Result<Vec<PortForward>, StorageError> {
        self.load_collection(FORWARDS_FILE)
    }

    pub fn save_forwards(&self, forwards: &[PortForward]) -> Result<(), StorageError> {
        self.save_json(FORWARDS_FILE, &forwards)
    }

    pub fn load_temp_users(&self) -> Result<Vec<TempUser>, StorageError> {
        self.load_collection(TEMP_USERS_FILE)
    }

    pub fn save_temp_users(&self, users: &[TempUser]) -> Result<(), StorageError> {
        self.save_json(TEMP_USERS_FILE, &users)
    }

    /// Hand out the next forward id and persist the incremented counter.
    pub fn next_forward_id(&self) -> Result<u64, StorageError> {
        let path = self.path(COUNTERS_FILE);
        let mut counters: Counters = if path.exists() {
            let content = Self::read(&path)?;
            serde_json::from_str(&content)
                .map_err(|source| StorageError::Malformed { path: path.clone(), source })?
        } else {
            Counters::default()
        };

        let id = counters.next_forward_id;
        counters.next_forward_id += 1;
        self.save_json(COUNTERS_FILE, &counters)?;
        Ok(id)
    }

    fn path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    fn read(path: &Path) -> Result<String, StorageError> {
        fs::read_to_string(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn load_collection<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, StorageError> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = Self::read(&path)?;
        serde_json::from_str(&content).map_err(|source| StorageError::Malformed { path, source })
    }

    fn save_json<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StorageError> {
        let path = self.path(name);
        let json = serde_json::to_string_pretty(value)
            .map_err(|source| StorageError::Malformed { path: path.clone(), source })?;
        fs::write(&path, json).map_err(|source| StorageError::Io { path, source })
    }
}
