//! Consistency engine for the garage back-office.
//!
//! Services in this crate coordinate the parts catalog, the intervention
//! records, the issuance ledger and the fleet over the [`atelier_store`]
//! repositories. Every mutating operation validates all preconditions before
//! its first write and holds the store-wide mutation lock for the whole
//! read-modify-write sequence, so the cross-collection effects in
//! [`interventions::InterventionService::consume_part`] and friends appear
//! atomic to callers. The one remaining failure mode, an I/O fault between
//! two collection writes, is surfaced as [`error::EngineError::PartialWrite`]
//! rather than swallowed.

pub mod catalog;
pub mod error;
pub mod fleet;
pub mod interventions;
pub mod stock;

#[cfg(test)]
mod integration_tests;

pub use catalog::{CatalogService, StockSummary, SupplierSummary};
pub use error::{EngineError, EngineResult};
pub use fleet::FleetService;
pub use interventions::{InterventionService, PartRequest, TechnicianHours, VehicleServiceSummary};
pub use stock::{InventoryUpdate, StockService};
