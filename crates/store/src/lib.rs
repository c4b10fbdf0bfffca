//! Persistence layer: named collections of records behind narrow repository
//! interfaces.
//!
//! The historical data lives as one JSON document per collection. Instead of
//! the whole-file load/mutate/save cycle, each collection is held as an
//! indexed map behind an `RwLock` and rewritten on every mutation; the
//! [`GarageStore`] additionally carries one store-wide mutation lock so that
//! read-modify-write sequences spanning several collections are serialized.

pub mod backend;
pub mod document;
pub mod error;
pub mod records;
pub mod repository;
pub mod store;

pub use backend::{DocumentBackend, JsonFileBackend, MemoryBackend};
pub use document::Document;
pub use error::StoreError;
pub use record_trait::Record;
pub use repository::Repository;
pub use store::{GarageStore, MutationGuard};

mod record_trait {
    use serde::Serialize;
    use serde::de::DeserializeOwned;

    use atelier_core::Entity;

    /// A record type persisted in a named collection.
    pub trait Record: Entity + Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
        /// Collection name; also the backing document name.
        const COLLECTION: &'static str;
    }
}
