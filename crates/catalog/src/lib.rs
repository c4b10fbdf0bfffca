//! Parts catalog domain module.
//!
//! Pure business rules for parts and suppliers: reference normalization,
//! stock withdrawal/restock invariants, low-stock detection, valuation.
//! No IO, no HTTP, no storage.

pub mod part;
pub mod supplier;

pub use part::{NewPart, Part, PartUpdate, stock_value};
pub use supplier::{NewSupplier, Supplier, SupplierUpdate};
