use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atelier_core::{DomainError, DomainResult, Entity, SupplierId};

/// Supplier record.
///
/// A supplier cannot be deleted while parts still reference it; that guard
/// lives in the engine, next to the other referential-integrity checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub contact: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSupplier {
    pub name: String,
    pub contact: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

pub type SupplierUpdate = NewSupplier;

impl Supplier {
    pub fn create(id: SupplierId, new: NewSupplier, now: DateTime<Utc>) -> DomainResult<Self> {
        if new.name.trim().is_empty() {
            return Err(DomainError::validation("supplier name cannot be empty"));
        }
        Ok(Self {
            id,
            name: new.name.trim().to_string(),
            contact: new.contact,
            phone: new.phone,
            email: new.email,
            address: new.address,
            created_at: now,
        })
    }

    pub fn apply_update(&mut self, update: SupplierUpdate) -> DomainResult<()> {
        if update.name.trim().is_empty() {
            return Err(DomainError::validation("supplier name cannot be empty"));
        }
        self.name = update.name.trim().to_string();
        self.contact = update.contact;
        self.phone = update.phone;
        self.email = update.email;
        self.address = update.address;
        Ok(())
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> SupplierId {
        self.id
    }
}
