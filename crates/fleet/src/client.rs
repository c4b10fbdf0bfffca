use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atelier_core::{ClientId, DomainError, DomainResult, Entity};

/// Client (vehicle owner) record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub last_name: String,
    pub first_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    pub last_name: String,
    pub first_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl Client {
    pub fn create(id: ClientId, new: NewClient, now: DateTime<Utc>) -> DomainResult<Self> {
        if new.last_name.trim().is_empty() {
            return Err(DomainError::validation("client last name cannot be empty"));
        }
        Ok(Self {
            id,
            last_name: new.last_name.trim().to_string(),
            first_name: new.first_name.trim().to_string(),
            phone: new.phone,
            email: new.email,
            address: new.address,
            added_at: now,
        })
    }

    pub fn apply_update(&mut self, update: NewClient) -> DomainResult<()> {
        if update.last_name.trim().is_empty() {
            return Err(DomainError::validation("client last name cannot be empty"));
        }
        self.last_name = update.last_name.trim().to_string();
        self.first_name = update.first_name.trim().to_string();
        self.phone = update.phone;
        self.email = update.email;
        self.address = update.address;
        Ok(())
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }
}

impl Entity for Client {
    type Id = ClientId;

    fn id(&self) -> ClientId {
        self.id
    }
}
