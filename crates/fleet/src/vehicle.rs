use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use atelier_core::{ClientId, DomainError, DomainResult, Entity, VehicleId};

use crate::control::ControlType;

/// Vehicle class, which determines the regulatory controls that apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    Car,
    Truck,
    Van,
    Trailer,
    Equipment,
    HeavyPlant,
}

impl VehicleClass {
    /// Controls this class is subject to.
    ///
    /// Cars, trucks and vans take the technical control; trucks additionally
    /// take weighing and tachograph controls; heavy plant takes the periodic
    /// inspection. Trailers and loose equipment carry none.
    pub fn applicable_controls(self) -> &'static [ControlType] {
        match self {
            VehicleClass::Car | VehicleClass::Van => &[ControlType::Technical],
            VehicleClass::Truck => &[
                ControlType::Technical,
                ControlType::Weighing,
                ControlType::Tachograph,
            ],
            VehicleClass::HeavyPlant => &[ControlType::PeriodicInspection],
            VehicleClass::Trailer | VehicleClass::Equipment => &[],
        }
    }

    pub fn control_applies(self, control: ControlType) -> bool {
        self.applicable_controls().contains(&control)
    }
}

/// Fleet vehicle record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub make: String,
    pub model: String,
    pub registration: String,
    pub fleet_code: String,
    pub serial_number: String,
    pub client_id: Option<ClientId>,
    pub class: VehicleClass,
    pub year: Option<u16>,
    /// Current odometer reading in km. Advanced only through intervention
    /// recording, never decreased.
    pub odometer: u32,
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_technical_control: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_weighing_control: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_tachograph_control: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_periodic_inspection: Option<NaiveDate>,
}

/// Input for registering a vehicle. Control dates are kept only where the
/// class makes the control applicable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicle {
    pub make: String,
    pub model: String,
    pub registration: String,
    pub fleet_code: String,
    pub serial_number: String,
    pub client_id: Option<ClientId>,
    pub class: VehicleClass,
    pub year: Option<u16>,
    pub odometer: u32,
    pub last_technical_control: Option<NaiveDate>,
    pub last_weighing_control: Option<NaiveDate>,
    pub last_tachograph_control: Option<NaiveDate>,
    pub last_periodic_inspection: Option<NaiveDate>,
}

/// Editable header fields (odometer and control dates go through their own
/// operations).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleUpdate {
    pub make: String,
    pub model: String,
    pub registration: String,
    pub fleet_code: String,
    pub serial_number: String,
    pub client_id: Option<ClientId>,
    pub year: Option<u16>,
}

impl Vehicle {
    pub fn create(id: VehicleId, new: NewVehicle, now: DateTime<Utc>) -> DomainResult<Self> {
        if new.registration.trim().is_empty() {
            return Err(DomainError::validation(
                "vehicle registration cannot be empty",
            ));
        }
        let class = new.class;
        let keep = |control: ControlType, date: Option<NaiveDate>| {
            if class.control_applies(control) {
                date
            } else {
                None
            }
        };
        Ok(Self {
            id,
            make: new.make,
            model: new.model,
            registration: new.registration.trim().to_string(),
            fleet_code: new.fleet_code,
            serial_number: new.serial_number,
            client_id: new.client_id,
            class,
            year: new.year,
            odometer: new.odometer,
            added_at: now,
            last_technical_control: keep(ControlType::Technical, new.last_technical_control),
            last_weighing_control: keep(ControlType::Weighing, new.last_weighing_control),
            last_tachograph_control: keep(ControlType::Tachograph, new.last_tachograph_control),
            last_periodic_inspection: keep(
                ControlType::PeriodicInspection,
                new.last_periodic_inspection,
            ),
        })
    }

    pub fn apply_update(&mut self, update: VehicleUpdate) -> DomainResult<()> {
        if update.registration.trim().is_empty() {
            return Err(DomainError::validation(
                "vehicle registration cannot be empty",
            ));
        }
        self.make = update.make;
        self.model = update.model;
        self.registration = update.registration.trim().to_string();
        self.fleet_code = update.fleet_code;
        self.serial_number = update.serial_number;
        self.client_id = update.client_id;
        self.year = update.year;
        Ok(())
    }

    pub fn last_control(&self, control: ControlType) -> Option<NaiveDate> {
        match control {
            ControlType::Technical => self.last_technical_control,
            ControlType::Weighing => self.last_weighing_control,
            ControlType::Tachograph => self.last_tachograph_control,
            ControlType::PeriodicInspection => self.last_periodic_inspection,
        }
    }

    /// Record that a control was performed on `date`.
    pub fn record_control(&mut self, control: ControlType, date: NaiveDate) -> DomainResult<()> {
        if !self.class.control_applies(control) {
            return Err(DomainError::validation(format!(
                "{} does not apply to this vehicle class",
                control.label()
            )));
        }
        match control {
            ControlType::Technical => self.last_technical_control = Some(date),
            ControlType::Weighing => self.last_weighing_control = Some(date),
            ControlType::Tachograph => self.last_tachograph_control = Some(date),
            ControlType::PeriodicInspection => self.last_periodic_inspection = Some(date),
        }
        Ok(())
    }

    /// Advance the odometer from an intervention. A lower reading than the
    /// current one is rejected.
    pub fn advance_odometer(&mut self, reading: u32) -> DomainResult<()> {
        if reading < self.odometer {
            return Err(DomainError::validation(format!(
                "odometer reading {reading} km is below the current {} km",
                self.odometer
            )));
        }
        self.odometer = reading;
        Ok(())
    }

    pub fn display_name(&self) -> String {
        format!("{} {} ({})", self.make, self.model, self.registration)
    }
}

impl Entity for Vehicle {
    type Id = VehicleId;

    fn id(&self) -> VehicleId {
        self.id
    }
}
