use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atelier_core::{Entity, InterventionId, IssuanceId, LineId, PartId, VehicleId};

use crate::intervention::{ConsumedLine, Intervention};

/// Ledger entry: a quantity of a part left stock for a vehicle.
///
/// Immutable once written, except for removal when the originating
/// consumed-part line is reversed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockIssuance {
    pub id: IssuanceId,
    pub part_id: PartId,
    pub vehicle_id: VehicleId,
    pub quantity: u32,
    pub issued_at: DateTime<Utc>,
    /// Display name of the acting user.
    pub issued_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intervention_id: Option<InterventionId>,
    /// Set when the issuance was produced by consuming a part into an
    /// intervention; reversal removes issuances by this key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<LineId>,
}

impl StockIssuance {
    /// Issuance backing a consumed-part line.
    pub fn for_line(
        intervention: &Intervention,
        line: &ConsumedLine,
        issued_by: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: IssuanceId::new(),
            part_id: line.part_id,
            vehicle_id: intervention.vehicle_id,
            quantity: line.quantity,
            issued_at: now,
            issued_by: issued_by.into(),
            intervention_id: Some(intervention.id),
            line_id: Some(line.line_id),
        }
    }

    /// Direct issuance, outside any intervention line.
    pub fn direct(
        part_id: PartId,
        vehicle_id: VehicleId,
        quantity: u32,
        issued_by: impl Into<String>,
        intervention_id: Option<InterventionId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: IssuanceId::new(),
            part_id,
            vehicle_id,
            quantity,
            issued_at: now,
            issued_by: issued_by.into(),
            intervention_id,
            line_id: None,
        }
    }
}

impl Entity for StockIssuance {
    type Id = IssuanceId;

    fn id(&self) -> IssuanceId {
        self.id
    }
}
