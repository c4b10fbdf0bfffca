//! End-to-end tests over the full service stack: catalog, interventions,
//! stock ledger, inventory audit and fleet alerts against one shared store.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use atelier_catalog::{NewPart, NewSupplier, PartUpdate};
    use atelier_core::{
        Actor, DomainError, Money, PartId, Role, UserId, VehicleId,
    };
    use atelier_fleet::{ControlType, NewClient, NewVehicle, Urgency, VehicleClass};
    use atelier_store::{
        DocumentBackend, GarageStore, MemoryBackend, StoreError,
    };
    use atelier_workshop::{InterventionStatus, NewIntervention};

    use crate::{
        CatalogService, EngineError, FleetService, InterventionService, InventoryUpdate,
        PartRequest, StockService,
    };

    struct Garage {
        store: Arc<GarageStore>,
        catalog: CatalogService,
        fleet: FleetService,
        interventions: InterventionService,
        stock: StockService,
    }

    fn garage() -> Garage {
        garage_on(Arc::new(MemoryBackend::new()))
    }

    fn garage_on(backend: Arc<dyn DocumentBackend>) -> Garage {
        let store = Arc::new(GarageStore::open(backend).unwrap());
        Garage {
            catalog: CatalogService::new(store.clone()),
            fleet: FleetService::new(store.clone()),
            interventions: InterventionService::new(store.clone()),
            stock: StockService::new(store.clone()),
            store,
        }
    }

    fn admin() -> Actor {
        Actor::new(UserId::new(), "Sophie", Role::Admin)
    }

    fn technician() -> Actor {
        Actor::new(UserId::new(), "Marc", Role::Technician)
    }

    fn new_part(reference: &str, quantity: u32, sale_cents: i64) -> NewPart {
        NewPart {
            reference: reference.to_string(),
            name: format!("Pièce {reference}"),
            description: String::new(),
            quantity,
            quantity_min: 2,
            purchase_price: Money::from_cents(sale_cents / 2),
            sale_price: Money::from_cents(sale_cents),
            supplier_id: None,
        }
    }

    fn new_vehicle(garage: &Garage, actor: &Actor) -> VehicleId {
        let client = garage
            .fleet
            .create_client(
                actor,
                NewClient {
                    first_name: "Jean".to_string(),
                    last_name: "Dupont".to_string(),
                    phone: String::new(),
                    email: String::new(),
                    address: String::new(),
                },
            )
            .unwrap();
        garage
            .fleet
            .register_vehicle(
                actor,
                NewVehicle {
                    make: "Renault".to_string(),
                    model: "Master".to_string(),
                    registration: "AB-123-CD".to_string(),
                    fleet_code: "V-07".to_string(),
                    serial_number: String::new(),
                    client_id: Some(client.id),
                    class: VehicleClass::Van,
                    year: Some(2019),
                    odometer: 50_000,
                    last_technical_control: None,
                    last_weighing_control: None,
                    last_tachograph_control: None,
                    last_periodic_inspection: None,
                },
            )
            .unwrap()
            .id
    }

    fn new_intervention(vehicle: VehicleId, garage: &Garage, odometer: u32) -> NewIntervention {
        let v = garage.fleet.vehicle(vehicle).unwrap();
        NewIntervention {
            vehicle_id: vehicle,
            client_id: v.client_id.unwrap(),
            date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            kind: "Révision".to_string(),
            description: "Entretien périodique".to_string(),
            odometer_reading: odometer,
            technician: "Marc".to_string(),
            hours: 2.5,
        }
    }

    #[test]
    fn consume_decrements_stock_and_appends_ledger_entry() {
        let g = garage();
        let actor = technician();
        let part = g.catalog.create_part(&actor, new_part("FLT-1", 10, 1250)).unwrap();
        let vehicle = new_vehicle(&g, &actor);
        let intervention = g
            .interventions
            .create_intervention(&actor, new_intervention(vehicle, &g, 50_100), &[])
            .unwrap();

        let line = g
            .interventions
            .consume_part(&actor, intervention.id, part.id, 3)
            .unwrap();

        assert_eq!(g.catalog.part(part.id).unwrap().quantity, 7);
        assert_eq!(line.quantity, 3);
        assert_eq!(line.unit_price, Money::from_cents(1250));
        assert_eq!(line.line_total, Money::from_cents(3750));

        let ledger = g.stock.issuances_for_intervention(intervention.id).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].part_id, part.id);
        assert_eq!(ledger[0].quantity, 3);
        assert_eq!(ledger[0].line_id, Some(line.line_id));
        assert_eq!(ledger[0].issued_by, "Marc");
    }

    #[test]
    fn line_snapshot_survives_later_price_change() {
        let g = garage();
        let actor = technician();
        let part = g.catalog.create_part(&actor, new_part("BRK-2", 5, 8000)).unwrap();
        let vehicle = new_vehicle(&g, &actor);
        let intervention = g
            .interventions
            .create_intervention(
                &actor,
                new_intervention(vehicle, &g, 50_100),
                &[PartRequest { part_id: part.id, quantity: 2 }],
            )
            .unwrap();

        g.catalog
            .update_part(
                &actor,
                part.id,
                PartUpdate {
                    reference: "BRK-2".to_string(),
                    name: "Plaquettes".to_string(),
                    description: String::new(),
                    quantity_min: 2,
                    purchase_price: Money::from_cents(5000),
                    sale_price: Money::from_cents(9900),
                    supplier_id: None,
                },
            )
            .unwrap();

        let stored = g.interventions.intervention(intervention.id).unwrap();
        assert_eq!(stored.parts_consumed[0].unit_price, Money::from_cents(8000));
        assert_eq!(stored.parts_total(), Money::from_cents(16000));
    }

    #[test]
    fn insufficient_stock_rejects_whole_creation() {
        let g = garage();
        let actor = technician();
        let plentiful = g.catalog.create_part(&actor, new_part("OIL-1", 40, 900)).unwrap();
        let scarce = g.catalog.create_part(&actor, new_part("FLT-9", 1, 1500)).unwrap();
        let vehicle = new_vehicle(&g, &actor);

        let result = g.interventions.create_intervention(
            &actor,
            new_intervention(vehicle, &g, 50_100),
            &[
                PartRequest { part_id: plentiful.id, quantity: 5 },
                PartRequest { part_id: scarce.id, quantity: 2 },
            ],
        );

        assert!(matches!(
            result,
            Err(EngineError::Domain(DomainError::InsufficientStock(_)))
        ));
        // Nothing moved: no partial stock decrement, no record, no ledger.
        assert_eq!(g.catalog.part(plentiful.id).unwrap().quantity, 40);
        assert_eq!(g.catalog.part(scarce.id).unwrap().quantity, 1);
        assert!(g.interventions.list_recent().unwrap().is_empty());
        assert!(g.stock.issuance_history().unwrap().is_empty());
    }

    #[test]
    fn duplicate_part_requests_are_checked_cumulatively() {
        let g = garage();
        let actor = technician();
        let part = g.catalog.create_part(&actor, new_part("BLT-3", 3, 200)).unwrap();
        let vehicle = new_vehicle(&g, &actor);

        let result = g.interventions.create_intervention(
            &actor,
            new_intervention(vehicle, &g, 50_100),
            &[
                PartRequest { part_id: part.id, quantity: 2 },
                PartRequest { part_id: part.id, quantity: 2 },
            ],
        );

        assert!(matches!(
            result,
            Err(EngineError::Domain(DomainError::InsufficientStock(_)))
        ));
        assert_eq!(g.catalog.part(part.id).unwrap().quantity, 3);
    }

    #[test]
    fn reverse_restores_stock_and_clears_ledger() {
        let g = garage();
        let actor = technician();
        let part = g.catalog.create_part(&actor, new_part("LMP-4", 10, 400)).unwrap();
        let vehicle = new_vehicle(&g, &actor);
        let intervention = g
            .interventions
            .create_intervention(&actor, new_intervention(vehicle, &g, 50_100), &[])
            .unwrap();
        g.interventions
            .consume_part(&actor, intervention.id, part.id, 4)
            .unwrap();

        g.interventions
            .reverse_consumed_part(&actor, intervention.id, part.id)
            .unwrap();

        assert_eq!(g.catalog.part(part.id).unwrap().quantity, 10);
        let stored = g.interventions.intervention(intervention.id).unwrap();
        assert!(stored.parts_consumed.is_empty());
        assert!(g.stock.issuances_for_intervention(intervention.id).unwrap().is_empty());
    }

    #[test]
    fn reversing_twice_fails_and_changes_nothing_further() {
        let g = garage();
        let actor = technician();
        let part = g.catalog.create_part(&actor, new_part("HSE-5", 6, 700)).unwrap();
        let vehicle = new_vehicle(&g, &actor);
        let intervention = g
            .interventions
            .create_intervention(&actor, new_intervention(vehicle, &g, 50_100), &[])
            .unwrap();
        let line = g
            .interventions
            .consume_part(&actor, intervention.id, part.id, 2)
            .unwrap();

        g.interventions
            .reverse_consumed_line(&actor, intervention.id, line.line_id)
            .unwrap();
        let second = g
            .interventions
            .reverse_consumed_line(&actor, intervention.id, line.line_id);

        assert!(matches!(
            second,
            Err(EngineError::Domain(DomainError::NotFound(_)))
        ));
        assert_eq!(g.catalog.part(part.id).unwrap().quantity, 6);
    }

    #[test]
    fn reverse_by_part_is_ambiguous_when_consumed_twice() {
        let g = garage();
        let actor = technician();
        let part = g.catalog.create_part(&actor, new_part("GSK-6", 10, 300)).unwrap();
        let vehicle = new_vehicle(&g, &actor);
        let intervention = g
            .interventions
            .create_intervention(&actor, new_intervention(vehicle, &g, 50_100), &[])
            .unwrap();
        let first = g
            .interventions
            .consume_part(&actor, intervention.id, part.id, 1)
            .unwrap();
        g.interventions
            .consume_part(&actor, intervention.id, part.id, 2)
            .unwrap();

        let by_part = g
            .interventions
            .reverse_consumed_part(&actor, intervention.id, part.id);
        assert!(matches!(
            by_part,
            Err(EngineError::Domain(DomainError::Ambiguous(_)))
        ));

        // Reversal by line id stays available.
        g.interventions
            .reverse_consumed_line(&actor, intervention.id, first.line_id)
            .unwrap();
        assert_eq!(g.catalog.part(part.id).unwrap().quantity, 8);
        let stored = g.interventions.intervention(intervention.id).unwrap();
        assert_eq!(stored.parts_consumed.len(), 1);
        assert_eq!(stored.parts_consumed[0].quantity, 2);
    }

    #[test]
    fn recount_audits_but_never_touches_the_ledger() {
        let g = garage();
        let actor = technician();
        let part = g.catalog.create_part(&actor, new_part("CLT-7", 9, 2500)).unwrap();

        let adjustment = g.stock.adjust_inventory(&actor, part.id, 14).unwrap();

        assert_eq!(g.catalog.part(part.id).unwrap().quantity, 14);
        assert_eq!(adjustment.previous_quantity, 9);
        assert_eq!(adjustment.new_quantity, 14);
        assert_eq!(adjustment.delta(), 5);
        assert!(g.stock.issuance_history().unwrap().is_empty());
        assert_eq!(g.stock.adjustments_for_part(part.id).unwrap().len(), 1);
    }

    #[test]
    fn batch_inventory_validates_every_part_before_writing() {
        let g = garage();
        let actor = technician();
        let known = g.catalog.create_part(&actor, new_part("PLG-8", 9, 450)).unwrap();

        let result = g.stock.apply_inventory(
            &actor,
            &[
                InventoryUpdate { part_id: known.id, new_quantity: 20 },
                InventoryUpdate { part_id: PartId::new(), new_quantity: 5 },
            ],
        );

        assert!(matches!(
            result,
            Err(EngineError::Domain(DomainError::NotFound(_)))
        ));
        assert_eq!(g.catalog.part(known.id).unwrap().quantity, 9);
        assert!(g.stock.adjustments_for_part(known.id).unwrap().is_empty());
    }

    #[test]
    fn duplicate_reference_is_rejected_case_insensitively() {
        let g = garage();
        let actor = technician();
        g.catalog.create_part(&actor, new_part("ref-77", 4, 100)).unwrap();

        let duplicate = g.catalog.create_part(&actor, new_part("REF-77", 1, 100));
        assert!(matches!(
            duplicate,
            Err(EngineError::Domain(DomainError::DuplicateReference(_)))
        ));
    }

    #[test]
    fn destructive_operations_require_admin() {
        let g = garage();
        let tech = technician();
        let part = g.catalog.create_part(&tech, new_part("ADM-1", 4, 100)).unwrap();

        let denied = g.catalog.delete_part(&tech, part.id);
        assert!(matches!(
            denied,
            Err(EngineError::Domain(DomainError::Unauthorized))
        ));

        g.catalog.delete_part(&admin(), part.id).unwrap();
        assert!(g.catalog.part(part.id).is_err());
    }

    #[test]
    fn part_referenced_by_ledger_cannot_be_deleted() {
        let g = garage();
        let actor = admin();
        let part = g.catalog.create_part(&actor, new_part("DEL-2", 8, 600)).unwrap();
        let vehicle = new_vehicle(&g, &actor);
        g.stock.issue_part(&actor, part.id, vehicle, 1, None).unwrap();

        let result = g.catalog.delete_part(&actor, part.id);
        assert!(matches!(
            result,
            Err(EngineError::Domain(DomainError::Conflict(_)))
        ));
    }

    #[test]
    fn supplier_with_parts_cannot_be_deleted() {
        let g = garage();
        let actor = admin();
        let supplier = g
            .catalog
            .create_supplier(
                &actor,
                NewSupplier {
                    name: "Fournitures Auto".to_string(),
                    contact: String::new(),
                    phone: String::new(),
                    email: String::new(),
                    address: String::new(),
                },
            )
            .unwrap();
        let mut part = new_part("SUP-3", 5, 900);
        part.supplier_id = Some(supplier.id);
        g.catalog.create_part(&actor, part).unwrap();

        let result = g.catalog.delete_supplier(&actor, supplier.id);
        assert!(matches!(
            result,
            Err(EngineError::Domain(DomainError::Conflict(_)))
        ));
    }

    #[test]
    fn vehicle_with_history_cannot_be_deleted() {
        let g = garage();
        let actor = admin();
        let vehicle = new_vehicle(&g, &actor);
        g.interventions
            .create_intervention(&actor, new_intervention(vehicle, &g, 50_100), &[])
            .unwrap();

        let result = g.fleet.delete_vehicle(&actor, vehicle);
        assert!(matches!(
            result,
            Err(EngineError::Domain(DomainError::Conflict(_)))
        ));
    }

    #[test]
    fn intervention_with_lines_must_be_reversed_before_deletion() {
        let g = garage();
        let actor = admin();
        let part = g.catalog.create_part(&actor, new_part("DEL-4", 5, 700)).unwrap();
        let vehicle = new_vehicle(&g, &actor);
        let intervention = g
            .interventions
            .create_intervention(&actor, new_intervention(vehicle, &g, 50_100), &[])
            .unwrap();
        let line = g
            .interventions
            .consume_part(&actor, intervention.id, part.id, 1)
            .unwrap();

        let blocked = g.interventions.delete_intervention(&actor, intervention.id);
        assert!(matches!(
            blocked,
            Err(EngineError::Domain(DomainError::Conflict(_)))
        ));

        g.interventions
            .reverse_consumed_line(&actor, intervention.id, line.line_id)
            .unwrap();
        g.interventions.delete_intervention(&actor, intervention.id).unwrap();
    }

    #[test]
    fn odometer_never_goes_backwards() {
        let g = garage();
        let actor = technician();
        let vehicle = new_vehicle(&g, &actor);

        let result = g.interventions.create_intervention(
            &actor,
            new_intervention(vehicle, &g, 49_000),
            &[],
        );
        assert!(matches!(
            result,
            Err(EngineError::Domain(DomainError::Validation(_)))
        ));
        assert_eq!(g.fleet.vehicle(vehicle).unwrap().odometer, 50_000);
    }

    #[test]
    fn status_transitions_are_free_form() {
        let g = garage();
        let actor = technician();
        let vehicle = new_vehicle(&g, &actor);
        let intervention = g
            .interventions
            .create_intervention(&actor, new_intervention(vehicle, &g, 50_100), &[])
            .unwrap();
        assert_eq!(intervention.status, InterventionStatus::InProgress);

        g.interventions
            .set_status(&actor, intervention.id, InterventionStatus::Done)
            .unwrap();
        g.interventions
            .set_status(&actor, intervention.id, InterventionStatus::Waiting)
            .unwrap();
        assert_eq!(
            g.interventions.intervention(intervention.id).unwrap().status,
            InterventionStatus::Waiting
        );
    }

    #[test]
    fn fleet_alerts_flow_through_the_configured_schedule() {
        let g = garage();
        let actor = admin();
        let vehicle = new_vehicle(&g, &actor);
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        g.fleet
            .record_control_done(
                &actor,
                vehicle,
                ControlType::Technical,
                today - chrono::Days::new(310),
            )
            .unwrap();

        let alerts = g.fleet.alerts(today).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].control, ControlType::Technical);
        assert_eq!(alerts[0].days_remaining, 55);
        assert_eq!(alerts[0].urgency, Urgency::Attention);
    }

    #[test]
    fn state_survives_store_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let actor = technician();
        let (part_id, intervention_id);
        {
            let g = garage_on(Arc::new(atelier_store::JsonFileBackend::new(
                dir.path().to_path_buf(),
            )));
            let part = g.catalog.create_part(&actor, new_part("PRS-9", 12, 1100)).unwrap();
            let vehicle = new_vehicle(&g, &actor);
            let intervention = g
                .interventions
                .create_intervention(
                    &actor,
                    new_intervention(vehicle, &g, 50_100),
                    &[PartRequest { part_id: part.id, quantity: 5 }],
                )
                .unwrap();
            part_id = part.id;
            intervention_id = intervention.id;
        }

        let g = garage_on(Arc::new(atelier_store::JsonFileBackend::new(
            dir.path().to_path_buf(),
        )));
        assert_eq!(g.catalog.part(part_id).unwrap().quantity, 7);
        let stored = g.interventions.intervention(intervention_id).unwrap();
        assert_eq!(stored.parts_consumed.len(), 1);
        assert_eq!(g.stock.issuances_for_part(part_id).unwrap().len(), 1);
    }

    #[test]
    fn hours_report_aggregates_per_technician() {
        let g = garage();
        let actor = technician();
        let vehicle = new_vehicle(&g, &actor);

        let mut new = new_intervention(vehicle, &g, 50_100);
        new.technician = "Marc".to_string();
        new.hours = 2.5;
        g.interventions.create_intervention(&actor, new, &[]).unwrap();

        let mut new = new_intervention(vehicle, &g, 50_200);
        new.technician = "Sophie".to_string();
        new.hours = 4.0;
        g.interventions.create_intervention(&actor, new, &[]).unwrap();

        let mut new = new_intervention(vehicle, &g, 50_300);
        new.technician = "Marc".to_string();
        new.hours = 3.0;
        g.interventions.create_intervention(&actor, new, &[]).unwrap();

        let report = g.interventions.hours_by_technician().unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].technician, "Marc");
        assert_eq!(report[0].total_hours, 5.5);
        assert_eq!(report[0].intervention_count, 2);
        assert_eq!(report[1].technician, "Sophie");
        assert_eq!(report[1].total_hours, 4.0);
        assert_eq!(report[1].intervention_count, 1);

        assert_eq!(g.interventions.for_technician("Marc").unwrap().len(), 2);
        assert!(g.interventions.for_technician("Paul").unwrap().is_empty());
    }

    #[test]
    fn reverse_by_part_stays_consistent_under_concurrent_consume() {
        let g = garage();
        let actor = technician();
        let part = g.catalog.create_part(&actor, new_part("CNC-1", 500, 100)).unwrap();
        let vehicle = new_vehicle(&g, &actor);
        let intervention = g
            .interventions
            .create_intervention(&actor, new_intervention(vehicle, &g, 50_100), &[])
            .unwrap();

        let reverser = InterventionService::new(g.store.clone());
        std::thread::scope(|scope| {
            let consumer = scope.spawn(|| {
                for _ in 0..50 {
                    g.interventions
                        .consume_part(&actor, intervention.id, part.id, 1)
                        .unwrap();
                }
            });
            for _ in 0..50 {
                match reverser.reverse_consumed_part(&actor, intervention.id, part.id) {
                    Ok(())
                    | Err(EngineError::Domain(DomainError::NotFound(_)))
                    | Err(EngineError::Domain(DomainError::Ambiguous(_))) => {}
                    Err(error) => panic!("unexpected failure: {error}"),
                }
            }
            consumer.join().unwrap();
        });

        // Stock conservation: every consumed unit is either on a line or
        // back on the shelf, and the ledger matches the lines exactly.
        let stored = g.interventions.intervention(intervention.id).unwrap();
        let consumed: u32 = stored.parts_consumed.iter().map(|l| l.quantity).sum();
        assert_eq!(g.catalog.part(part.id).unwrap().quantity + consumed, 500);

        let mut ledger_lines: Vec<_> = g
            .stock
            .issuances_for_intervention(intervention.id)
            .unwrap()
            .iter()
            .filter_map(|s| s.line_id)
            .collect();
        let mut lines: Vec<_> = stored.parts_consumed.iter().map(|l| l.line_id).collect();
        ledger_lines.sort();
        lines.sort();
        assert_eq!(ledger_lines, lines);
    }

    /// Backend that accepts every write except for one named collection.
    struct FailingBackend {
        inner: MemoryBackend,
        fail_collection: &'static str,
    }

    impl DocumentBackend for FailingBackend {
        fn read(&self, collection: &str) -> Result<Option<String>, StoreError> {
            self.inner.read(collection)
        }

        fn write(&self, collection: &str, contents: &str) -> Result<(), StoreError> {
            if collection == self.fail_collection {
                return Err(StoreError::io(
                    collection.to_string(),
                    std::io::Error::other("disk full"),
                ));
            }
            self.inner.write(collection, contents)
        }
    }

    #[test]
    fn write_fault_after_first_write_reports_partial_write() {
        let g = garage_on(Arc::new(FailingBackend {
            inner: MemoryBackend::new(),
            fail_collection: "interventions",
        }));
        let actor = technician();
        let part = g.catalog.create_part(&actor, new_part("IOF-1", 10, 500)).unwrap();
        let vehicle = new_vehicle(&g, &actor);

        let result = g.interventions.create_intervention(
            &actor,
            new_intervention(vehicle, &g, 50_100),
            &[PartRequest { part_id: part.id, quantity: 1 }],
        );

        assert!(matches!(
            result,
            Err(EngineError::PartialWrite { collection: "interventions", .. })
        ));
    }

    #[test]
    fn write_fault_before_any_write_is_a_plain_store_error() {
        let g = garage_on(Arc::new(FailingBackend {
            inner: MemoryBackend::new(),
            fail_collection: "parts",
        }));
        let actor = technician();

        let result = g.catalog.create_part(&actor, new_part("IOF-2", 10, 500));
        assert!(matches!(result, Err(EngineError::Store(_))));
    }
}
