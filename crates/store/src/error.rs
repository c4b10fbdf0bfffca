//! Persistence error model.

use thiserror::Error;

/// Storage-level failure. Domain failures never originate here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io failure on collection '{collection}': {source}")]
    Io {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt collection '{collection}': {source}")]
    Corrupt {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("record already exists in collection '{collection}': {id}")]
    AlreadyExists { collection: String, id: String },

    /// A lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn io(collection: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            collection: collection.into(),
            source,
        }
    }

    pub fn corrupt(collection: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Corrupt {
            collection: collection.into(),
            source,
        }
    }
}
