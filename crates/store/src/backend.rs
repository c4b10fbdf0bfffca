//! Document backends: where collection documents are actually kept.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::StoreError;

/// Raw storage of named documents (one per collection).
///
/// Backends know nothing about record shapes; repositories handle JSON.
pub trait DocumentBackend: Send + Sync {
    /// Read a document. `Ok(None)` when it was never written.
    fn read(&self, collection: &str) -> Result<Option<String>, StoreError>;

    /// Replace a document's contents.
    fn write(&self, collection: &str, contents: &str) -> Result<(), StoreError>;
}

/// One JSON file per collection under a root directory.
#[derive(Debug)]
pub struct JsonFileBackend {
    root: PathBuf,
}

impl JsonFileBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}.json"))
    }
}

impl DocumentBackend for JsonFileBackend {
    fn read(&self, collection: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(collection)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(collection, e)),
        }
    }

    fn write(&self, collection: &str, contents: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|e| StoreError::io(collection, e))?;
        // Write-then-rename so a crash mid-write cannot truncate the document.
        let tmp = self.root.join(format!("{collection}.json.tmp"));
        fs::write(&tmp, contents).map_err(|e| StoreError::io(collection, e))?;
        fs::rename(&tmp, self.path_for(collection)).map_err(|e| StoreError::io(collection, e))
    }
}

/// In-memory backend for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentBackend for MemoryBackend {
    fn read(&self, collection: &str) -> Result<Option<String>, StoreError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(documents.get(collection).cloned())
    }

    fn write(&self, collection: &str, contents: &str) -> Result<(), StoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        documents.insert(collection.to_string(), contents.to_string());
        Ok(())
    }
}
