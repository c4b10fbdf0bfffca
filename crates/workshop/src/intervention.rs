use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use atelier_catalog::Part;
use atelier_core::{
    ClientId, DomainError, DomainResult, Entity, InterventionId, LineId, Money, PartId, VehicleId,
};

/// Intervention status lifecycle. Serialized with the French labels the
/// historical data set uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterventionStatus {
    #[serde(rename = "En cours")]
    InProgress,
    #[serde(rename = "En réparation")]
    UnderRepair,
    #[serde(rename = "Terminé")]
    Done,
    #[serde(rename = "En attente")]
    Waiting,
    #[serde(rename = "En diagnostic")]
    Diagnosing,
    #[serde(rename = "Pièces commandées")]
    PartsOrdered,
}

impl InterventionStatus {
    pub fn label(self) -> &'static str {
        match self {
            InterventionStatus::InProgress => "En cours",
            InterventionStatus::UnderRepair => "En réparation",
            InterventionStatus::Done => "Terminé",
            InterventionStatus::Waiting => "En attente",
            InterventionStatus::Diagnosing => "En diagnostic",
            InterventionStatus::PartsOrdered => "Pièces commandées",
        }
    }
}

impl core::fmt::Display for InterventionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// One part consumed by an intervention.
///
/// `name` and `unit_price` are snapshots taken at consumption time so that
/// historical cost reporting stays stable when the catalog changes later.
/// The line carries its own id: reversing "by part id" alone is ambiguous
/// when the same part was consumed twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumedLine {
    pub line_id: LineId,
    pub part_id: PartId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub line_total: Money,
}

impl ConsumedLine {
    /// Snapshot `part` at the moment of consumption.
    pub fn snapshot(part: &Part, quantity: u32) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::invalid_quantity(
                "consumed quantity must be a positive integer",
            ));
        }
        Ok(Self {
            line_id: LineId::new(),
            part_id: part.id,
            name: part.name.clone(),
            unit_price: part.sale_price,
            quantity,
            line_total: part.sale_price.times(quantity),
        })
    }
}

/// Service event on a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    pub id: InterventionId,
    pub vehicle_id: VehicleId,
    pub client_id: ClientId,
    pub date: NaiveDate,
    /// Free-text intervention kind, e.g. "Vidange".
    pub kind: String,
    pub description: String,
    pub odometer_reading: u32,
    /// Technician display name.
    pub technician: String,
    pub hours: f64,
    pub parts_consumed: Vec<ConsumedLine>,
    pub status: InterventionStatus,
    pub created_at: DateTime<Utc>,
}

// f64 blocks derive(Eq), but `hours` is validated finite on every write
// path, so equality is total here.
impl Eq for Intervention {}

#[derive(Debug, Clone, PartialEq)]
pub struct NewIntervention {
    pub vehicle_id: VehicleId,
    pub client_id: ClientId,
    pub date: NaiveDate,
    pub kind: String,
    pub description: String,
    pub odometer_reading: u32,
    pub technician: String,
    pub hours: f64,
}

/// Header-field update; parts change only through consume/reverse.
#[derive(Debug, Clone, PartialEq)]
pub struct InterventionUpdate {
    pub date: NaiveDate,
    pub kind: String,
    pub description: String,
    pub odometer_reading: u32,
    pub technician: String,
    pub hours: f64,
}

impl Intervention {
    pub fn create(id: InterventionId, new: NewIntervention, now: DateTime<Utc>) -> DomainResult<Self> {
        validate_hours(new.hours)?;
        Ok(Self {
            id,
            vehicle_id: new.vehicle_id,
            client_id: new.client_id,
            date: new.date,
            kind: new.kind,
            description: new.description,
            odometer_reading: new.odometer_reading,
            technician: new.technician,
            hours: new.hours,
            parts_consumed: Vec::new(),
            status: InterventionStatus::InProgress,
            created_at: now,
        })
    }

    pub fn apply_update(&mut self, update: InterventionUpdate) -> DomainResult<()> {
        validate_hours(update.hours)?;
        self.date = update.date;
        self.kind = update.kind;
        self.description = update.description;
        self.odometer_reading = update.odometer_reading;
        self.technician = update.technician;
        self.hours = update.hours;
        Ok(())
    }

    pub fn push_line(&mut self, line: ConsumedLine) {
        self.parts_consumed.push(line);
    }

    /// Remove the line with `line_id`, returning it for the stock restore.
    pub fn remove_line(&mut self, line_id: LineId) -> Option<ConsumedLine> {
        let idx = self
            .parts_consumed
            .iter()
            .position(|l| l.line_id == line_id)?;
        Some(self.parts_consumed.remove(idx))
    }

    /// Resolve a part id to a single line id. `Ambiguous` when the part was
    /// consumed more than once in this intervention.
    pub fn line_for_part(&self, part_id: PartId) -> DomainResult<LineId> {
        let mut matches = self
            .parts_consumed
            .iter()
            .filter(|l| l.part_id == part_id);
        let first = matches
            .next()
            .ok_or_else(|| DomainError::not_found("consumed-part line"))?;
        if matches.next().is_some() {
            return Err(DomainError::ambiguous(format!(
                "part '{}' appears on several lines; reverse by line id",
                first.name
            )));
        }
        Ok(first.line_id)
    }

    pub fn references_part(&self, part_id: PartId) -> bool {
        self.parts_consumed.iter().any(|l| l.part_id == part_id)
    }

    /// Derived total of consumed parts; never stored redundantly.
    pub fn parts_total(&self) -> Money {
        self.parts_consumed.iter().map(|l| l.line_total).sum()
    }
}

impl Entity for Intervention {
    type Id = InterventionId;

    fn id(&self) -> InterventionId {
        self.id
    }
}

fn validate_hours(hours: f64) -> DomainResult<()> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(DomainError::validation("hours must be zero or positive"));
    }
    Ok(())
}
