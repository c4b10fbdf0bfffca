//! Singleton configuration documents.

use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::DocumentBackend;
use crate::error::StoreError;

/// A single typed document (e.g. the control-threshold configuration).
/// Falls back to `T::default()` when never written.
pub struct Document<T> {
    backend: Arc<dyn DocumentBackend>,
    name: &'static str,
    value: RwLock<T>,
}

impl<T: Clone + Default + Serialize + DeserializeOwned> Document<T> {
    pub fn open(backend: Arc<dyn DocumentBackend>, name: &'static str) -> Result<Self, StoreError> {
        let value = match backend.read(name)? {
            Some(contents) => {
                serde_json::from_str(&contents).map_err(|e| StoreError::corrupt(name, e))?
            }
            None => T::default(),
        };
        Ok(Self {
            backend,
            name,
            value: RwLock::new(value),
        })
    }

    pub fn get(&self) -> Result<T, StoreError> {
        let value = self.value.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(value.clone())
    }

    pub fn set(&self, new_value: T) -> Result<(), StoreError> {
        let mut value = self.value.write().map_err(|_| StoreError::LockPoisoned)?;
        let contents = serde_json::to_string_pretty(&new_value)
            .map_err(|e| StoreError::corrupt(self.name, e))?;
        self.backend.write(self.name, &contents)?;
        *value = new_value;
        Ok(())
    }
}
