//! Generic indexed repository over a document backend.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use atelier_core::Entity;

use crate::Record;
use crate::backend::DocumentBackend;
use crate::error::StoreError;

/// Indexed store for one collection: a map keyed by id, rewritten to the
/// backend on every mutation.
///
/// Lookups are O(1); callers never see the whole-document load/save cycle.
/// Cross-collection atomicity is the [`crate::GarageStore`] mutation lock's
/// concern, not this type's.
pub struct Repository<T: Record> {
    backend: Arc<dyn DocumentBackend>,
    records: RwLock<HashMap<<T as Entity>::Id, T>>,
}

impl<T: Record> Repository<T> {
    /// Load the collection; a missing document is an empty collection.
    pub fn open(backend: Arc<dyn DocumentBackend>) -> Result<Self, StoreError> {
        let records = match backend.read(T::COLLECTION)? {
            Some(contents) => {
                let list: Vec<T> = serde_json::from_str(&contents)
                    .map_err(|e| StoreError::corrupt(T::COLLECTION, e))?;
                list.into_iter().map(|r| (r.id(), r)).collect()
            }
            None => HashMap::new(),
        };
        Ok(Self {
            backend,
            records: RwLock::new(records),
        })
    }

    pub fn get(&self, id: &<T as Entity>::Id) -> Result<Option<T>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.get(id).cloned())
    }

    /// All records, ordered by id for deterministic output. Callers needing a
    /// domain ordering (date, urgency) sort themselves.
    pub fn list(&self) -> Result<Vec<T>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut list: Vec<T> = records.values().cloned().collect();
        list.sort_by_key(|r| r.id());
        Ok(list)
    }

    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Result<Vec<T>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut list: Vec<T> = records.values().filter(|r| pred(r)).cloned().collect();
        list.sort_by_key(|r| r.id());
        Ok(list)
    }

    pub fn any(&self, pred: impl Fn(&T) -> bool) -> Result<bool, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.values().any(|r| pred(r)))
    }

    pub fn count(&self, pred: impl Fn(&T) -> bool) -> Result<usize, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.values().filter(|r| pred(r)).count())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Insert a brand-new record; an existing id is a storage error.
    pub fn insert(&self, record: T) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        let id = record.id();
        if records.contains_key(&id) {
            return Err(StoreError::AlreadyExists {
                collection: T::COLLECTION.to_string(),
                id: format!("{id:?}"),
            });
        }
        records.insert(id, record);
        Self::persist(&self.backend, &records)
    }

    /// Insert-or-replace.
    pub fn put(&self, record: T) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        records.insert(record.id(), record);
        Self::persist(&self.backend, &records)
    }

    /// Remove one record; `Ok(false)` when absent (nothing rewritten).
    pub fn remove(&self, id: &<T as Entity>::Id) -> Result<bool, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        if records.remove(id).is_none() {
            return Ok(false);
        }
        Self::persist(&self.backend, &records)?;
        Ok(true)
    }

    /// Drop every record failing `keep`, returning how many were removed.
    pub fn retain(&self, keep: impl Fn(&T) -> bool) -> Result<usize, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        let before = records.len();
        records.retain(|_, r| keep(r));
        let removed = before - records.len();
        if removed > 0 {
            Self::persist(&self.backend, &records)?;
        }
        Ok(removed)
    }

    fn persist(
        backend: &Arc<dyn DocumentBackend>,
        records: &HashMap<<T as Entity>::Id, T>,
    ) -> Result<(), StoreError> {
        let mut list: Vec<&T> = records.values().collect();
        list.sort_by_key(|r| r.id());
        let contents = serde_json::to_string_pretty(&list)
            .map_err(|e| StoreError::corrupt(T::COLLECTION, e))?;
        backend.write(T::COLLECTION, &contents)
    }
}
