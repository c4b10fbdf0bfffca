//! Collection bindings for every persisted record type.
//!
//! Collection names mirror the historical per-entity JSON documents.

use atelier_catalog::{Part, Supplier};
use atelier_fleet::{Client, Vehicle};
use atelier_workshop::{Intervention, InventoryAdjustment, StockIssuance};

use crate::Record;

impl Record for Part {
    const COLLECTION: &'static str = "parts";
}

impl Record for Supplier {
    const COLLECTION: &'static str = "suppliers";
}

impl Record for Vehicle {
    const COLLECTION: &'static str = "vehicles";
}

impl Record for Client {
    const COLLECTION: &'static str = "clients";
}

impl Record for Intervention {
    const COLLECTION: &'static str = "interventions";
}

impl Record for StockIssuance {
    const COLLECTION: &'static str = "issuances";
}

impl Record for InventoryAdjustment {
    const COLLECTION: &'static str = "inventory_adjustments";
}
