//! Maintenance-alert calculator.
//!
//! For every (vehicle, applicable control) pair with a recorded last-control
//! date, compute the next due date and bucket it by urgency. Vehicles with no
//! recorded date for a control produce no alert for it; whether that should
//! become an "unknown/overdue" state is an open product question.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use atelier_core::VehicleId;

use crate::control::{ControlSchedule, ControlType};
use crate::vehicle::Vehicle;

/// Urgency bucket. Ordering matters: alerts sort urgent-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    Attention,
    Ok,
}

/// One upcoming (or overdue) control for one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Stable identifier, `<control key>_<vehicle id>`.
    pub id: String,
    pub vehicle_id: VehicleId,
    pub vehicle_name: String,
    pub control: ControlType,
    pub last_control: NaiveDate,
    pub next_due: NaiveDate,
    /// Negative when the control is overdue.
    pub days_remaining: i64,
    pub urgency: Urgency,
}

/// Compute alerts for every vehicle and applicable control with a recorded
/// date, ordered urgent-first then by ascending due date.
pub fn compute_alerts(
    vehicles: &[Vehicle],
    schedule: &ControlSchedule,
    today: NaiveDate,
) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = vehicles
        .iter()
        .flat_map(|vehicle| {
            vehicle
                .class
                .applicable_controls()
                .iter()
                .filter_map(|&control| alert_for(vehicle, control, schedule, today))
        })
        .collect();

    alerts.sort_by(|a, b| {
        a.urgency
            .cmp(&b.urgency)
            .then_with(|| a.next_due.cmp(&b.next_due))
    });
    alerts
}

fn alert_for(
    vehicle: &Vehicle,
    control: ControlType,
    schedule: &ControlSchedule,
    today: NaiveDate,
) -> Option<Alert> {
    let last_control = vehicle.last_control(control)?;
    let thresholds = schedule.thresholds(control);
    let next_due = last_control + Duration::days(thresholds.period_days);
    let days_remaining = (next_due - today).num_days();

    let urgency = if days_remaining <= thresholds.urgent {
        Urgency::Urgent
    } else if days_remaining <= thresholds.attention {
        Urgency::Attention
    } else {
        Urgency::Ok
    };

    Some(Alert {
        id: format!("{}_{}", control.key(), vehicle.id),
        vehicle_id: vehicle.id,
        vehicle_name: vehicle.display_name(),
        control,
        last_control,
        next_due,
        days_remaining,
        urgency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlThresholds;
    use crate::vehicle::{NewVehicle, VehicleClass};
    use chrono::Utc;
    use proptest::prelude::*;

    fn vehicle(class: VehicleClass, last_ct_days_ago: Option<i64>, today: NaiveDate) -> Vehicle {
        Vehicle::create(
            atelier_core::VehicleId::new(),
            NewVehicle {
                make: "Iveco".to_string(),
                model: "Daily".to_string(),
                registration: "XY-456-ZZ".to_string(),
                fleet_code: String::new(),
                serial_number: String::new(),
                client_id: None,
                class,
                year: None,
                odometer: 0,
                last_technical_control: last_ct_days_ago.map(|d| today - Duration::days(d)),
                last_weighing_control: None,
                last_tachograph_control: None,
                last_periodic_inspection: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn schedule_365_60_30() -> ControlSchedule {
        let mut schedule = ControlSchedule::default();
        schedule.set_thresholds(ControlType::Technical, ControlThresholds::new(365, 60, 30));
        schedule
    }

    #[test]
    fn last_control_310_days_ago_is_attention() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let vehicles = [vehicle(VehicleClass::Van, Some(310), today)];
        let alerts = compute_alerts(&vehicles, &schedule_365_60_30(), today);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].days_remaining, 55);
        assert_eq!(alerts[0].urgency, Urgency::Attention);
    }

    #[test]
    fn days_remaining_above_attention_threshold_is_ok() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let vehicles = [vehicle(VehicleClass::Van, Some(300), today)];
        let alerts = compute_alerts(&vehicles, &schedule_365_60_30(), today);

        // 65 days remaining, strictly above the 60-day attention threshold.
        assert_eq!(alerts[0].days_remaining, 65);
        assert_eq!(alerts[0].urgency, Urgency::Ok);
    }

    #[test]
    fn last_control_340_days_ago_is_urgent() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let vehicles = [vehicle(VehicleClass::Van, Some(340), today)];
        let alerts = compute_alerts(&vehicles, &schedule_365_60_30(), today);

        assert_eq!(alerts[0].days_remaining, 25);
        assert_eq!(alerts[0].urgency, Urgency::Urgent);
    }

    #[test]
    fn overdue_control_has_negative_days_remaining() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let vehicles = [vehicle(VehicleClass::Van, Some(400), today)];
        let alerts = compute_alerts(&vehicles, &schedule_365_60_30(), today);

        assert_eq!(alerts[0].days_remaining, -35);
        assert_eq!(alerts[0].urgency, Urgency::Urgent);
    }

    #[test]
    fn missing_date_produces_no_alert() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let vehicles = [vehicle(VehicleClass::Van, None, today)];
        assert!(compute_alerts(&vehicles, &schedule_365_60_30(), today).is_empty());
    }

    #[test]
    fn ordering_is_urgency_bucket_then_due_date() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let schedule = schedule_365_60_30();
        let vehicles = [
            vehicle(VehicleClass::Van, Some(320), today), // attention, due in 45 days
            vehicle(VehicleClass::Van, Some(350), today), // urgent, due in 15 days
            vehicle(VehicleClass::Van, Some(360), today), // urgent, due in 5 days
            vehicle(VehicleClass::Van, Some(100), today), // ok
        ];
        let alerts = compute_alerts(&vehicles, &schedule, today);

        let urgencies: Vec<Urgency> = alerts.iter().map(|a| a.urgency).collect();
        assert_eq!(
            urgencies,
            [
                Urgency::Urgent,
                Urgency::Urgent,
                Urgency::Attention,
                Urgency::Ok
            ]
        );
        // Within the urgent bucket, soonest due first.
        assert!(alerts[0].next_due < alerts[1].next_due);
    }

    #[test]
    fn truck_can_raise_one_alert_per_control() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let mut truck = vehicle(VehicleClass::Truck, Some(100), today);
        truck
            .record_control(ControlType::Weighing, today - Duration::days(200))
            .unwrap();
        truck
            .record_control(ControlType::Tachograph, today - Duration::days(700))
            .unwrap();

        let alerts = compute_alerts(
            std::slice::from_ref(&truck),
            &ControlSchedule::default(),
            today,
        );
        assert_eq!(alerts.len(), 3);
    }

    proptest! {
        /// Urgency never relaxes as the last control recedes into the past.
        #[test]
        fn urgency_is_monotonic_in_control_age(days_ago in 0i64..2000, extra in 1i64..500) {
            let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
            let schedule = schedule_365_60_30();

            let newer = [vehicle(VehicleClass::Van, Some(days_ago), today)];
            let older = [vehicle(VehicleClass::Van, Some(days_ago + extra), today)];
            let newer = &compute_alerts(&newer, &schedule, today)[0];
            let older = &compute_alerts(&older, &schedule, today)[0];

            prop_assert!(older.urgency <= newer.urgency);
            prop_assert!(older.days_remaining < newer.days_remaining);
        }
    }
}
