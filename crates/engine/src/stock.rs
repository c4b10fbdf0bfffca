//! Stock movements outside intervention lines: direct issuance and the
//! inventory recount channel.

use std::sync::Arc;

use chrono::Utc;

use atelier_core::{Actor, DomainError, InterventionId, PartId, VehicleId};
use atelier_store::GarageStore;
use atelier_workshop::{InventoryAdjustment, StockIssuance};

use crate::error::{EngineResult, WriteSequence};

/// One recount entry in a batch inventory application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryUpdate {
    pub part_id: PartId,
    pub new_quantity: u32,
}

pub struct StockService {
    store: Arc<GarageStore>,
}

impl StockService {
    pub fn new(store: Arc<GarageStore>) -> Self {
        Self { store }
    }

    /// Issue a quantity of a part to a vehicle without touching any
    /// intervention's consumed lines.
    pub fn issue_part(
        &self,
        actor: &Actor,
        part_id: PartId,
        vehicle_id: VehicleId,
        quantity: u32,
        intervention_id: Option<InterventionId>,
    ) -> EngineResult<StockIssuance> {
        if quantity == 0 {
            return Err(DomainError::invalid_quantity(
                "issued quantity must be a positive integer",
            )
            .into());
        }
        let _guard = self.store.mutate()?;
        let mut part = self
            .store
            .parts
            .get(&part_id)?
            .ok_or_else(|| DomainError::not_found("part"))?;
        if self.store.vehicles.get(&vehicle_id)?.is_none() {
            return Err(DomainError::not_found("vehicle").into());
        }
        if let Some(id) = intervention_id
            && self.store.interventions.get(&id)?.is_none()
        {
            return Err(DomainError::not_found("intervention").into());
        }
        part.withdraw(quantity)?;
        let issuance = StockIssuance::direct(
            part_id,
            vehicle_id,
            quantity,
            actor.name.as_str(),
            intervention_id,
            Utc::now(),
        );

        let mut seq = WriteSequence::new();
        seq.step("parts", self.store.parts.put(part))?;
        seq.step("issuances", self.store.issuances.insert(issuance.clone()))?;
        tracing::info!(
            %part_id,
            %vehicle_id,
            quantity,
            user = %actor.name,
            "part issued from stock"
        );
        Ok(issuance)
    }

    /// Overwrite a part's quantity from a physical recount.
    ///
    /// Always appends one audit entry. Never touches the issuance ledger;
    /// recounts and usage are separate channels.
    pub fn adjust_inventory(
        &self,
        actor: &Actor,
        part_id: PartId,
        new_quantity: u32,
    ) -> EngineResult<InventoryAdjustment> {
        let _guard = self.store.mutate()?;
        let adjustment = self.recount_locked(actor, part_id, new_quantity)?;
        Ok(adjustment)
    }

    /// Batch recount. All part ids are resolved before the first write.
    pub fn apply_inventory(
        &self,
        actor: &Actor,
        updates: &[InventoryUpdate],
    ) -> EngineResult<Vec<InventoryAdjustment>> {
        let _guard = self.store.mutate()?;
        for update in updates {
            if self.store.parts.get(&update.part_id)?.is_none() {
                return Err(DomainError::not_found("part").into());
            }
        }
        let mut entries = Vec::with_capacity(updates.len());
        for update in updates {
            entries.push(self.recount_locked(actor, update.part_id, update.new_quantity)?);
        }
        Ok(entries)
    }

    /// Issuance ledger, most recent first.
    pub fn issuance_history(&self) -> EngineResult<Vec<StockIssuance>> {
        let mut issuances = self.store.issuances.list()?;
        issuances.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(issuances)
    }

    pub fn issuances_for_part(&self, part_id: PartId) -> EngineResult<Vec<StockIssuance>> {
        Ok(self.store.issuances.filter(|s| s.part_id == part_id)?)
    }

    pub fn issuances_for_vehicle(&self, vehicle_id: VehicleId) -> EngineResult<Vec<StockIssuance>> {
        Ok(self.store.issuances.filter(|s| s.vehicle_id == vehicle_id)?)
    }

    pub fn issuances_for_intervention(
        &self,
        intervention_id: InterventionId,
    ) -> EngineResult<Vec<StockIssuance>> {
        Ok(self
            .store
            .issuances
            .filter(|s| s.intervention_id == Some(intervention_id))?)
    }

    /// Audit trail for one part, most recent first.
    pub fn adjustments_for_part(&self, part_id: PartId) -> EngineResult<Vec<InventoryAdjustment>> {
        let mut entries = self.store.adjustments.filter(|a| a.part_id == part_id)?;
        entries.sort_by(|a, b| b.adjusted_at.cmp(&a.adjusted_at));
        Ok(entries)
    }

    // Caller holds the mutation lock.
    fn recount_locked(
        &self,
        actor: &Actor,
        part_id: PartId,
        new_quantity: u32,
    ) -> EngineResult<InventoryAdjustment> {
        let mut part = self
            .store
            .parts
            .get(&part_id)?
            .ok_or_else(|| DomainError::not_found("part"))?;
        let previous = part.recount(new_quantity);
        let adjustment = InventoryAdjustment::recount(part_id, previous, new_quantity, Utc::now());

        let mut seq = WriteSequence::new();
        seq.step("parts", self.store.parts.put(part))?;
        seq.step(
            "inventory_adjustments",
            self.store.adjustments.insert(adjustment.clone()),
        )?;
        tracing::info!(
            %part_id,
            previous,
            new_quantity,
            user = %actor.name,
            "inventory recount applied"
        );
        Ok(adjustment)
    }
}
