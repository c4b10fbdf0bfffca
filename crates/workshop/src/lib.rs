//! Workshop domain module: interventions, the stock-issuance ledger and the
//! inventory-adjustment audit trail.
//!
//! Pure domain logic; the cross-collection consistency rules that tie these
//! records to the parts catalog live in `atelier-engine`.

pub mod adjustment;
pub mod intervention;
pub mod issuance;

pub use adjustment::{AdjustmentKind, InventoryAdjustment};
pub use intervention::{
    ConsumedLine, Intervention, InterventionStatus, InterventionUpdate, NewIntervention,
};
pub use issuance::StockIssuance;
