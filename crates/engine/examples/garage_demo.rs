//! Walks the full back-office flow against a throwaway store: catalog a
//! part, register a client and vehicle, open an intervention consuming
//! stock, reverse a line, recount, then print the alert board.
//!
//! Run with `cargo run -p atelier-engine --example garage_demo`.

use std::sync::Arc;

use chrono::{Days, Local, NaiveDate};

use atelier_catalog::NewPart;
use atelier_core::{Actor, Money, Role, UserId};
use atelier_engine::{
    CatalogService, FleetService, InterventionService, PartRequest, StockService,
};
use atelier_fleet::{NewClient, NewVehicle, VehicleClass};
use atelier_store::GarageStore;
use atelier_workshop::{InterventionStatus, NewIntervention};

fn main() -> anyhow::Result<()> {
    atelier_observability::init();

    let dir = tempfile::tempdir()?;
    let store = Arc::new(GarageStore::open_dir(dir.path())?);
    let catalog = CatalogService::new(store.clone());
    let fleet = FleetService::new(store.clone());
    let interventions = InterventionService::new(store.clone());
    let stock = StockService::new(store);

    let actor = Actor::new(UserId::new(), "Sophie", Role::Admin);
    let today: NaiveDate = Local::now().date_naive();

    let part = catalog.create_part(
        &actor,
        NewPart {
            reference: "FLT-HU716".to_string(),
            name: "Filtre à huile".to_string(),
            description: "Filtre vissé, moteurs diesel".to_string(),
            quantity: 10,
            quantity_min: 4,
            purchase_price: Money::from_cents(650),
            sale_price: Money::from_cents(1490),
            supplier_id: None,
        },
    )?;

    let client = fleet.create_client(
        &actor,
        NewClient {
            last_name: "Dupont".to_string(),
            first_name: "Jean".to_string(),
            phone: "06 12 34 56 78".to_string(),
            email: "j.dupont@example.fr".to_string(),
            address: "12 rue des Forges".to_string(),
        },
    )?;

    let vehicle = fleet.register_vehicle(
        &actor,
        NewVehicle {
            make: "Renault".to_string(),
            model: "Master".to_string(),
            registration: "AB-123-CD".to_string(),
            fleet_code: "V-07".to_string(),
            serial_number: "VF1MA000012345678".to_string(),
            client_id: Some(client.id),
            class: VehicleClass::Van,
            year: Some(2019),
            odometer: 50_000,
            last_technical_control: Some(today - Days::new(310)),
            last_weighing_control: None,
            last_tachograph_control: None,
            last_periodic_inspection: None,
        },
    )?;

    let intervention = interventions.create_intervention(
        &actor,
        NewIntervention {
            vehicle_id: vehicle.id,
            client_id: client.id,
            date: today,
            kind: "Révision".to_string(),
            description: "Vidange et remplacement du filtre".to_string(),
            odometer_reading: 50_120,
            technician: "Marc".to_string(),
            hours: 1.5,
        },
        &[PartRequest { part_id: part.id, quantity: 2 }],
    )?;
    println!(
        "intervention {} ouverte, pièces consommées: {}",
        intervention.id,
        intervention.parts_consumed.len()
    );
    println!("stock restant: {}", catalog.part(part.id)?.quantity);

    // One filter too many on the work order; put it back.
    let extra = interventions.consume_part(&actor, intervention.id, part.id, 1)?;
    interventions.reverse_consumed_line(&actor, intervention.id, extra.line_id)?;
    println!("après annulation: {}", catalog.part(part.id)?.quantity);

    // Physical recount found one more on the shelf.
    let adjustment = stock.adjust_inventory(&actor, part.id, 9)?;
    println!("recomptage: {}", adjustment.note);

    interventions.set_status(&actor, intervention.id, InterventionStatus::Done)?;

    for alert in fleet.alerts(today)? {
        println!(
            "[{:?}] {} {} dans {} jours (échéance {})",
            alert.urgency,
            alert.vehicle_name,
            alert.control.label(),
            alert.days_remaining,
            alert.next_due
        );
    }

    let summary = catalog.stock_summary()?;
    println!(
        "{} références, {} sous le seuil, valeur {}",
        summary.part_count, summary.low_stock_count, summary.total_value
    );
    Ok(())
}
