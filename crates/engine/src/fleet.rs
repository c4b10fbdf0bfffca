//! Vehicle and client management plus the maintenance alert board.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use atelier_core::{Actor, ClientId, DomainError, VehicleId};
use atelier_fleet::{
    Alert, Client, ControlSchedule, ControlThresholds, ControlType, NewClient, NewVehicle,
    Vehicle, VehicleUpdate, compute_alerts,
};
use atelier_store::GarageStore;

use crate::error::EngineResult;

pub struct FleetService {
    store: Arc<GarageStore>,
}

impl FleetService {
    pub fn new(store: Arc<GarageStore>) -> Self {
        Self { store }
    }

    pub fn register_vehicle(&self, actor: &Actor, new: NewVehicle) -> EngineResult<Vehicle> {
        let _guard = self.store.mutate()?;
        if let Some(client_id) = new.client_id
            && self.store.clients.get(&client_id)?.is_none()
        {
            return Err(DomainError::not_found("client").into());
        }
        let vehicle = Vehicle::create(VehicleId::new(), new, Utc::now())?;
        self.store.vehicles.insert(vehicle.clone())?;
        tracing::info!(vehicle_id = %vehicle.id, registration = %vehicle.registration, user = %actor.name, "vehicle registered");
        Ok(vehicle)
    }

    pub fn update_vehicle(
        &self,
        actor: &Actor,
        vehicle_id: VehicleId,
        update: VehicleUpdate,
    ) -> EngineResult<Vehicle> {
        let _guard = self.store.mutate()?;
        let mut vehicle = self
            .store
            .vehicles
            .get(&vehicle_id)?
            .ok_or_else(|| DomainError::not_found("vehicle"))?;
        if let Some(client_id) = update.client_id
            && self.store.clients.get(&client_id)?.is_none()
        {
            return Err(DomainError::not_found("client").into());
        }
        vehicle.apply_update(update)?;
        self.store.vehicles.put(vehicle.clone())?;
        tracing::info!(%vehicle_id, user = %actor.name, "vehicle updated");
        Ok(vehicle)
    }

    /// Deletion is refused while interventions or stock issuances still
    /// reference the vehicle.
    pub fn delete_vehicle(&self, actor: &Actor, vehicle_id: VehicleId) -> EngineResult<()> {
        actor.require_admin()?;
        let _guard = self.store.mutate()?;
        if self.store.vehicles.get(&vehicle_id)?.is_none() {
            return Err(DomainError::not_found("vehicle").into());
        }
        let referenced = self
            .store
            .interventions
            .any(|i| i.vehicle_id == vehicle_id)?
            || self.store.issuances.any(|s| s.vehicle_id == vehicle_id)?;
        if referenced {
            return Err(DomainError::conflict(
                "vehicle still has interventions or stock issuances recorded against it",
            )
            .into());
        }
        self.store.vehicles.remove(&vehicle_id)?;
        tracing::info!(%vehicle_id, user = %actor.name, "vehicle deleted");
        Ok(())
    }

    pub fn vehicle(&self, id: VehicleId) -> EngineResult<Vehicle> {
        Ok(self
            .store
            .vehicles
            .get(&id)?
            .ok_or_else(|| DomainError::not_found("vehicle"))?)
    }

    pub fn list_vehicles(&self) -> EngineResult<Vec<Vehicle>> {
        Ok(self.store.vehicles.list()?)
    }

    pub fn vehicles_for_client(&self, client_id: ClientId) -> EngineResult<Vec<Vehicle>> {
        Ok(self
            .store
            .vehicles
            .filter(|v| v.client_id == Some(client_id))?)
    }

    /// Record a completed periodic control, resetting its countdown.
    pub fn record_control_done(
        &self,
        actor: &Actor,
        vehicle_id: VehicleId,
        control: ControlType,
        date: NaiveDate,
    ) -> EngineResult<Vehicle> {
        let _guard = self.store.mutate()?;
        let mut vehicle = self
            .store
            .vehicles
            .get(&vehicle_id)?
            .ok_or_else(|| DomainError::not_found("vehicle"))?;
        vehicle.record_control(control, date)?;
        self.store.vehicles.put(vehicle.clone())?;
        tracing::info!(%vehicle_id, control = control.key(), %date, user = %actor.name, "control recorded");
        Ok(vehicle)
    }

    // -- clients ---------------------------------------------------------

    pub fn create_client(&self, actor: &Actor, new: NewClient) -> EngineResult<Client> {
        let _guard = self.store.mutate()?;
        let client = Client::create(ClientId::new(), new, Utc::now())?;
        self.store.clients.insert(client.clone())?;
        tracing::info!(client_id = %client.id, name = %client.display_name(), user = %actor.name, "client created");
        Ok(client)
    }

    pub fn update_client(
        &self,
        actor: &Actor,
        client_id: ClientId,
        update: NewClient,
    ) -> EngineResult<Client> {
        let _guard = self.store.mutate()?;
        let mut client = self
            .store
            .clients
            .get(&client_id)?
            .ok_or_else(|| DomainError::not_found("client"))?;
        client.apply_update(update)?;
        self.store.clients.put(client.clone())?;
        tracing::info!(%client_id, user = %actor.name, "client updated");
        Ok(client)
    }

    /// Deletion is refused while vehicles are still assigned to the client.
    pub fn delete_client(&self, actor: &Actor, client_id: ClientId) -> EngineResult<()> {
        actor.require_admin()?;
        let _guard = self.store.mutate()?;
        if self.store.clients.get(&client_id)?.is_none() {
            return Err(DomainError::not_found("client").into());
        }
        if self
            .store
            .vehicles
            .any(|v| v.client_id == Some(client_id))?
        {
            return Err(DomainError::conflict(
                "client still has vehicles assigned; reassign or delete them first",
            )
            .into());
        }
        self.store.clients.remove(&client_id)?;
        tracing::info!(%client_id, user = %actor.name, "client deleted");
        Ok(())
    }

    pub fn client(&self, id: ClientId) -> EngineResult<Client> {
        Ok(self
            .store
            .clients
            .get(&id)?
            .ok_or_else(|| DomainError::not_found("client"))?)
    }

    pub fn list_clients(&self) -> EngineResult<Vec<Client>> {
        Ok(self.store.clients.list()?)
    }

    // -- alerts ----------------------------------------------------------

    /// The maintenance board: one alert per vehicle and applicable control
    /// with a recorded date, urgent-first.
    pub fn alerts(&self, today: NaiveDate) -> EngineResult<Vec<Alert>> {
        let vehicles = self.store.vehicles.list()?;
        let schedule = self.store.control_schedule.get()?;
        Ok(compute_alerts(&vehicles, &schedule, today))
    }

    pub fn control_schedule(&self) -> EngineResult<ControlSchedule> {
        Ok(self.store.control_schedule.get()?)
    }

    pub fn set_control_thresholds(
        &self,
        actor: &Actor,
        control: ControlType,
        thresholds: ControlThresholds,
    ) -> EngineResult<ControlSchedule> {
        actor.require_admin()?;
        let _guard = self.store.mutate()?;
        let mut schedule = self.store.control_schedule.get()?;
        schedule.set_thresholds(control, thresholds);
        self.store.control_schedule.set(schedule.clone())?;
        tracing::info!(control = control.key(), user = %actor.name, "control thresholds updated");
        Ok(schedule)
    }
}
