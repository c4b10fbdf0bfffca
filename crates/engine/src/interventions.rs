//! Intervention lifecycle and the consume/reverse consistency rules.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use chrono::Utc;

use atelier_catalog::Part;
use atelier_core::{
    Actor, DomainError, InterventionId, LineId, Money, PartId, VehicleId,
};
use atelier_store::GarageStore;
use atelier_workshop::{
    ConsumedLine, Intervention, InterventionStatus, InterventionUpdate, NewIntervention,
    StockIssuance,
};

use crate::error::{EngineResult, WriteSequence};

/// A part to consume when creating an intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartRequest {
    pub part_id: PartId,
    pub quantity: u32,
}

/// Service history figures for one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct VehicleServiceSummary {
    pub intervention_count: usize,
    pub parts_cost: Money,
}

/// Worked-hours figures for one technician.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TechnicianHours {
    pub technician: String,
    pub total_hours: f64,
    pub intervention_count: usize,
}

pub struct InterventionService {
    store: Arc<GarageStore>,
}

impl InterventionService {
    pub fn new(store: Arc<GarageStore>) -> Self {
        Self { store }
    }

    /// Create an intervention, consuming `parts` in the same sequence.
    ///
    /// Everything is validated before the first write: vehicle and client
    /// must exist, the odometer may not go backwards, and every requested
    /// part must have sufficient stock (checked cumulatively, so asking
    /// twice for the same part cannot oversell it). Persist order is parts,
    /// interventions, issuances, vehicles.
    pub fn create_intervention(
        &self,
        actor: &Actor,
        new: NewIntervention,
        parts: &[PartRequest],
    ) -> EngineResult<Intervention> {
        let _guard = self.store.mutate()?;
        let mut vehicle = self
            .store
            .vehicles
            .get(&new.vehicle_id)?
            .ok_or_else(|| DomainError::not_found("vehicle"))?;
        if self.store.clients.get(&new.client_id)?.is_none() {
            return Err(DomainError::not_found("client").into());
        }
        vehicle.advance_odometer(new.odometer_reading)?;

        let mut intervention = Intervention::create(InterventionId::new(), new, Utc::now())?;
        let mut touched: HashMap<PartId, Part> = HashMap::new();
        let mut issuances = Vec::with_capacity(parts.len());
        for request in parts {
            let part = match touched.entry(request.part_id) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let part = self
                        .store
                        .parts
                        .get(&request.part_id)?
                        .ok_or_else(|| DomainError::not_found("part"))?;
                    entry.insert(part)
                }
            };
            part.withdraw(request.quantity)?;
            let line = ConsumedLine::snapshot(part, request.quantity)?;
            intervention.push_line(line.clone());
            issuances.push(StockIssuance::for_line(
                &intervention,
                &line,
                actor.name.as_str(),
                Utc::now(),
            ));
        }

        let mut seq = WriteSequence::new();
        let mut written_parts: Vec<Part> = touched.into_values().collect();
        written_parts.sort_by_key(|p| p.id);
        for part in written_parts {
            seq.step("parts", self.store.parts.put(part))?;
        }
        seq.step(
            "interventions",
            self.store.interventions.insert(intervention.clone()),
        )?;
        for issuance in issuances {
            seq.step("issuances", self.store.issuances.insert(issuance))?;
        }
        seq.step("vehicles", self.store.vehicles.put(vehicle))?;

        tracing::info!(
            intervention_id = %intervention.id,
            vehicle_id = %intervention.vehicle_id,
            lines = intervention.parts_consumed.len(),
            user = %actor.name,
            "intervention created"
        );
        Ok(intervention)
    }

    /// Consume a part into an existing intervention.
    ///
    /// Decrements the catalog quantity, appends a snapshot line and appends
    /// a ledger entry, as one unit under the mutation lock. Persist order is
    /// parts, then interventions, then issuances, so a crash between writes
    /// can never leave stock counted as available while an issuance exists.
    pub fn consume_part(
        &self,
        actor: &Actor,
        intervention_id: InterventionId,
        part_id: PartId,
        quantity: u32,
    ) -> EngineResult<ConsumedLine> {
        if quantity == 0 {
            return Err(DomainError::invalid_quantity(
                "consumed quantity must be a positive integer",
            )
            .into());
        }
        let _guard = self.store.mutate()?;
        let mut intervention = self
            .store
            .interventions
            .get(&intervention_id)?
            .ok_or_else(|| DomainError::not_found("intervention"))?;
        let mut part = self
            .store
            .parts
            .get(&part_id)?
            .ok_or_else(|| DomainError::not_found("part"))?;

        part.withdraw(quantity)?;
        let line = ConsumedLine::snapshot(&part, quantity)?;
        intervention.push_line(line.clone());
        let issuance =
            StockIssuance::for_line(&intervention, &line, actor.name.as_str(), Utc::now());

        let mut seq = WriteSequence::new();
        seq.step("parts", self.store.parts.put(part))?;
        seq.step("interventions", self.store.interventions.put(intervention))?;
        seq.step("issuances", self.store.issuances.insert(issuance))?;

        tracing::info!(
            %intervention_id,
            %part_id,
            quantity,
            user = %actor.name,
            "part consumed into intervention"
        );
        Ok(line)
    }

    /// Reverse one consumed line: restore stock, drop the line, drop the
    /// matching ledger entries.
    ///
    /// Invoking this twice for the same line fails with NotFound the second
    /// time and changes nothing further. When the part was deleted from the
    /// catalog in the meantime, the stock restoration is skipped (and
    /// logged); the line and ledger cleanup still happen.
    pub fn reverse_consumed_line(
        &self,
        actor: &Actor,
        intervention_id: InterventionId,
        line_id: LineId,
    ) -> EngineResult<()> {
        let _guard = self.store.mutate()?;
        self.reverse_line_locked(actor, intervention_id, line_id)
    }

    /// Reverse by part id. Unambiguous only when the part appears on exactly
    /// one line; otherwise the caller must reverse by line id. Resolution and
    /// reversal happen under one guard, so a concurrent consume cannot slip
    /// between them.
    pub fn reverse_consumed_part(
        &self,
        actor: &Actor,
        intervention_id: InterventionId,
        part_id: PartId,
    ) -> EngineResult<()> {
        let _guard = self.store.mutate()?;
        let line_id = self
            .store
            .interventions
            .get(&intervention_id)?
            .ok_or_else(|| DomainError::not_found("intervention"))?
            .line_for_part(part_id)?;
        self.reverse_line_locked(actor, intervention_id, line_id)
    }

    // Caller holds the mutation lock.
    fn reverse_line_locked(
        &self,
        actor: &Actor,
        intervention_id: InterventionId,
        line_id: LineId,
    ) -> EngineResult<()> {
        let mut intervention = self
            .store
            .interventions
            .get(&intervention_id)?
            .ok_or_else(|| DomainError::not_found("intervention"))?;
        let line = intervention
            .remove_line(line_id)
            .ok_or_else(|| DomainError::not_found("consumed-part line"))?;

        let mut seq = WriteSequence::new();
        match self.store.parts.get(&line.part_id)? {
            Some(mut part) => {
                part.restock(line.quantity);
                seq.step("parts", self.store.parts.put(part))?;
            }
            None => {
                tracing::warn!(
                    part_id = %line.part_id,
                    "part no longer in catalog; stock restoration skipped"
                );
            }
        }
        seq.step("interventions", self.store.interventions.put(intervention))?;
        seq.step(
            "issuances",
            self.store
                .issuances
                .retain(|s| s.line_id != Some(line_id))
                .map(|_| ()),
        )?;

        tracing::info!(
            %intervention_id,
            %line_id,
            quantity = line.quantity,
            user = %actor.name,
            "consumed line reversed"
        );
        Ok(())
    }

    pub fn set_status(
        &self,
        actor: &Actor,
        intervention_id: InterventionId,
        status: InterventionStatus,
    ) -> EngineResult<()> {
        let _guard = self.store.mutate()?;
        let mut intervention = self
            .store
            .interventions
            .get(&intervention_id)?
            .ok_or_else(|| DomainError::not_found("intervention"))?;
        intervention.status = status;
        self.store.interventions.put(intervention)?;
        tracing::info!(%intervention_id, %status, user = %actor.name, "intervention status changed");
        Ok(())
    }

    /// Header-field update. Parts change only through consume/reverse; the
    /// vehicle odometer is advanced when the new reading is higher.
    pub fn update_intervention(
        &self,
        actor: &Actor,
        intervention_id: InterventionId,
        update: InterventionUpdate,
    ) -> EngineResult<Intervention> {
        let _guard = self.store.mutate()?;
        let mut intervention = self
            .store
            .interventions
            .get(&intervention_id)?
            .ok_or_else(|| DomainError::not_found("intervention"))?;
        let mut vehicle = self
            .store
            .vehicles
            .get(&intervention.vehicle_id)?
            .ok_or_else(|| DomainError::not_found("vehicle"))?;
        vehicle.advance_odometer(update.odometer_reading)?;
        intervention.apply_update(update)?;

        let mut seq = WriteSequence::new();
        seq.step(
            "interventions",
            self.store.interventions.put(intervention.clone()),
        )?;
        seq.step("vehicles", self.store.vehicles.put(vehicle))?;
        tracing::info!(%intervention_id, user = %actor.name, "intervention updated");
        Ok(intervention)
    }

    /// Deletion is refused while the intervention still has consumed lines;
    /// reverse them first. Direct issuances recorded against it stay in the
    /// ledger as history.
    pub fn delete_intervention(
        &self,
        actor: &Actor,
        intervention_id: InterventionId,
    ) -> EngineResult<()> {
        actor.require_admin()?;
        let _guard = self.store.mutate()?;
        let intervention = self
            .store
            .interventions
            .get(&intervention_id)?
            .ok_or_else(|| DomainError::not_found("intervention"))?;
        if !intervention.parts_consumed.is_empty() {
            return Err(DomainError::conflict(
                "intervention still has consumed parts; reverse them first",
            )
            .into());
        }
        self.store.interventions.remove(&intervention_id)?;
        tracing::info!(%intervention_id, user = %actor.name, "intervention deleted");
        Ok(())
    }

    pub fn intervention(&self, id: InterventionId) -> EngineResult<Intervention> {
        Ok(self
            .store
            .interventions
            .get(&id)?
            .ok_or_else(|| DomainError::not_found("intervention"))?)
    }

    /// All interventions, most recent date first.
    pub fn list_recent(&self) -> EngineResult<Vec<Intervention>> {
        let mut interventions = self.store.interventions.list()?;
        interventions.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(interventions)
    }

    /// Service history for one vehicle, oldest first.
    pub fn for_vehicle(&self, vehicle_id: VehicleId) -> EngineResult<Vec<Intervention>> {
        let mut history = self
            .store
            .interventions
            .filter(|i| i.vehicle_id == vehicle_id)?;
        history.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(history)
    }

    /// Worked hours aggregated per technician, busiest first.
    pub fn hours_by_technician(&self) -> EngineResult<Vec<TechnicianHours>> {
        let mut totals: HashMap<String, (f64, usize)> = HashMap::new();
        for intervention in self.store.interventions.list()? {
            let entry = totals.entry(intervention.technician).or_insert((0.0, 0));
            entry.0 += intervention.hours;
            entry.1 += 1;
        }
        let mut report: Vec<TechnicianHours> = totals
            .into_iter()
            .map(|(technician, (total_hours, intervention_count))| TechnicianHours {
                technician,
                total_hours,
                intervention_count,
            })
            .collect();
        report.sort_by(|a, b| {
            b.total_hours
                .total_cmp(&a.total_hours)
                .then_with(|| a.technician.cmp(&b.technician))
        });
        Ok(report)
    }

    /// One technician's interventions, oldest first.
    pub fn for_technician(&self, technician: &str) -> EngineResult<Vec<Intervention>> {
        let mut history = self
            .store
            .interventions
            .filter(|i| i.technician == technician)?;
        history.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(history)
    }

    pub fn vehicle_summary(&self, vehicle_id: VehicleId) -> EngineResult<VehicleServiceSummary> {
        let history = self.for_vehicle(vehicle_id)?;
        Ok(VehicleServiceSummary {
            intervention_count: history.len(),
            parts_cost: history.iter().map(Intervention::parts_total).sum(),
        })
    }
}
