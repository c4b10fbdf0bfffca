//! Fleet domain module: vehicles, clients, regulatory controls.
//!
//! Pure domain logic only. The maintenance-alert calculator takes the data it
//! needs as arguments and never touches storage.

pub mod alerts;
pub mod client;
pub mod control;
pub mod vehicle;

pub use alerts::{Alert, Urgency, compute_alerts};
pub use client::{Client, NewClient};
pub use control::{ControlSchedule, ControlThresholds, ControlType};
pub use vehicle::{NewVehicle, Vehicle, VehicleClass, VehicleUpdate};
