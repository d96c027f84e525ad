use crate::error::StoreError;
use ahash::AHashMap;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// A local key-value store holding serialized strategy documents.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Returns whether the key was present.
    fn remove(&mut self, key: &str) -> Result<bool, StoreError>;
}

/// Process-local store, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: AHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.remove(key).is_some())
    }
}

/// A single bincode-encoded key/value map on disk.
///
/// Each operation opens, uses and drops its own file handle. Writes go to a
/// sibling temp file that is renamed over the store, so a failed write leaves
/// the previous contents intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<AHashMap<String, String>, StoreError> {
        let mut file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AHashMap::new()),
            Err(e) => {
                return Err(StoreError::Io(format!(
                    "Could not open store '{}': {}",
                    self.path.display(),
                    e
                )));
            }
        };
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| {
            StoreError::Io(format!(
                "Could not read store '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        if bytes.is_empty() {
            return Ok(AHashMap::new());
        }
        decode_from_slice(&bytes, standard())
            .map(|(entries, _)| entries)
            .map_err(|e| StoreError::Encoding(e.to_string()))
    }

    fn write_entries(&self, entries: &AHashMap<String, String>) -> Result<(), StoreError> {
        let bytes = encode_to_vec(entries, standard())
            .map_err(|e| StoreError::Encoding(e.to_string()))?;
        let staging = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&staging).map_err(|e| {
                StoreError::Io(format!(
                    "Could not create '{}': {}",
                    staging.display(),
                    e
                ))
            })?;
            file.write_all(&bytes)
                .and_then(|_| file.sync_all())
                .map_err(|e| {
                    StoreError::Io(format!("Could not write '{}': {}", staging.display(), e))
                })?;
        }
        fs::rename(&staging, &self.path).map_err(|e| {
            StoreError::Io(format!(
                "Could not replace store '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.read_entries()?;
        let removed = entries.remove(key).is_some();
        if removed {
            self.write_entries(&entries)?;
        }
        Ok(removed)
    }
}
