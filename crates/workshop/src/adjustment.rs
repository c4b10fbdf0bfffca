use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atelier_core::{AdjustmentId, Entity, PartId};

/// Why a quantity was overwritten. Only physical recounts exist today; the
/// enum keeps the audit trail extensible without a schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    Inventory,
}

/// Audit entry: a raw quantity overwrite outside the issuance flow.
///
/// Append-only; this channel is intentionally separate from the issuance
/// ledger (physical recount vs. usage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryAdjustment {
    pub id: AdjustmentId,
    pub part_id: PartId,
    pub kind: AdjustmentKind,
    pub previous_quantity: u32,
    pub new_quantity: u32,
    pub adjusted_at: DateTime<Utc>,
    pub note: String,
}

impl InventoryAdjustment {
    /// Record a physical recount, capturing the signed delta in the note.
    pub fn recount(
        part_id: PartId,
        previous_quantity: u32,
        new_quantity: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let delta = new_quantity as i64 - previous_quantity as i64;
        Self {
            id: AdjustmentId::new(),
            part_id,
            kind: AdjustmentKind::Inventory,
            previous_quantity,
            new_quantity,
            adjusted_at: now,
            note: format!("inventory recount (delta: {delta:+})"),
        }
    }

    pub fn delta(&self) -> i64 {
        self.new_quantity as i64 - self.previous_quantity as i64
    }
}

impl Entity for InventoryAdjustment {
    type Id = AdjustmentId;

    fn id(&self) -> AdjustmentId {
        self.id
    }
}
