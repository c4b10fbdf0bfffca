//! `atelier-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod actor;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use actor::{Actor, Role};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{
    AdjustmentId, ClientId, InterventionId, IssuanceId, LineId, PartId, SupplierId, UserId,
    VehicleId,
};
pub use money::Money;
