//! The set of repositories backing the garage back-office, plus the
//! store-wide mutation lock.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use atelier_catalog::{Part, Supplier};
use atelier_fleet::{Client, ControlSchedule, Vehicle};
use atelier_workshop::{Intervention, InventoryAdjustment, StockIssuance};

use crate::backend::{DocumentBackend, JsonFileBackend, MemoryBackend};
use crate::document::Document;
use crate::error::StoreError;
use crate::repository::Repository;

/// Exclusive access token for a read-modify-write sequence.
///
/// Every engine operation that writes acquires this for its full duration, so
/// two concurrent consumptions can never both pass the stock-sufficiency
/// check before either one writes.
pub type MutationGuard<'a> = MutexGuard<'a, ()>;

/// All persisted collections of the back-office.
pub struct GarageStore {
    pub parts: Repository<Part>,
    pub suppliers: Repository<Supplier>,
    pub vehicles: Repository<Vehicle>,
    pub clients: Repository<Client>,
    pub interventions: Repository<Intervention>,
    pub issuances: Repository<StockIssuance>,
    pub adjustments: Repository<InventoryAdjustment>,
    pub control_schedule: Document<ControlSchedule>,
    mutation: Mutex<()>,
}

impl GarageStore {
    pub fn open(backend: Arc<dyn DocumentBackend>) -> Result<Self, StoreError> {
        Ok(Self {
            parts: Repository::open(backend.clone())?,
            suppliers: Repository::open(backend.clone())?,
            vehicles: Repository::open(backend.clone())?,
            clients: Repository::open(backend.clone())?,
            interventions: Repository::open(backend.clone())?,
            issuances: Repository::open(backend.clone())?,
            adjustments: Repository::open(backend.clone())?,
            control_schedule: Document::open(backend, "control_thresholds")?,
            mutation: Mutex::new(()),
        })
    }

    /// Open against one JSON file per collection under `root`.
    pub fn open_dir(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open(Arc::new(JsonFileBackend::new(root.as_ref().to_path_buf())))
    }

    /// Ephemeral store for tests and tooling.
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::open(Arc::new(MemoryBackend::new()))
    }

    /// Acquire the store-wide mutation lock. Released on drop, including on
    /// the error path.
    pub fn mutate(&self) -> Result<MutationGuard<'_>, StoreError> {
        self.mutation.lock().map_err(|_| StoreError::LockPoisoned)
    }
}
