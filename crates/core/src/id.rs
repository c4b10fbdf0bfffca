//! Strongly-typed identifiers used across the domain.
//!
//! Every persisted collection keys its records by one of these newtypes, so a
//! `PartId` can never be handed to an API expecting an `InterventionId`.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! impl_uuid_newtype {
    ($(#[$doc:meta])* $t:ident, $name:literal) => {
        $(#[$doc])*
        #[derive(
            Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $t(Uuid);

        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| DomainError::validation(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

impl_uuid_newtype!(
    /// Identifier of a catalog part.
    PartId,
    "PartId"
);
impl_uuid_newtype!(
    /// Identifier of a supplier.
    SupplierId,
    "SupplierId"
);
impl_uuid_newtype!(
    /// Identifier of a fleet vehicle.
    VehicleId,
    "VehicleId"
);
impl_uuid_newtype!(
    /// Identifier of a client (vehicle owner).
    ClientId,
    "ClientId"
);
impl_uuid_newtype!(
    /// Identifier of a service intervention.
    InterventionId,
    "InterventionId"
);
impl_uuid_newtype!(
    /// Identifier of a stock issuance (ledger entry).
    IssuanceId,
    "IssuanceId"
);
impl_uuid_newtype!(
    /// Identifier of an inventory adjustment (audit entry).
    AdjustmentId,
    "AdjustmentId"
);
impl_uuid_newtype!(
    /// Identifier of a consumed-part line inside an intervention.
    ///
    /// Lines carry their own id so that reversal is unambiguous even when the
    /// same part was consumed twice in one intervention.
    LineId,
    "LineId"
);
impl_uuid_newtype!(
    /// Identifier of an acting user.
    UserId,
    "UserId"
);
