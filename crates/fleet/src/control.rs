//! Regulatory control types and their scheduling thresholds.

use serde::{Deserialize, Serialize};

/// Periodic control a vehicle may be subject to, depending on its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    /// Contrôle technique.
    Technical,
    /// Passage aux mines (weighing-station control).
    Weighing,
    /// Tachograph calibration.
    Tachograph,
    /// VGP periodic inspection for lifting/plant equipment.
    PeriodicInspection,
}

impl ControlType {
    pub const ALL: [ControlType; 4] = [
        ControlType::Technical,
        ControlType::Weighing,
        ControlType::Tachograph,
        ControlType::PeriodicInspection,
    ];

    /// Short key used in alert identifiers.
    pub fn key(self) -> &'static str {
        match self {
            ControlType::Technical => "ct",
            ControlType::Weighing => "mine",
            ControlType::Tachograph => "tachy",
            ControlType::PeriodicInspection => "vgp",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ControlType::Technical => "Contrôle technique",
            ControlType::Weighing => "Contrôle aux mines",
            ControlType::Tachograph => "Tachygraphe",
            ControlType::PeriodicInspection => "Visite générale périodique",
        }
    }
}

impl core::fmt::Display for ControlType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Scheduling thresholds for one control type, in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlThresholds {
    /// Interval between two controls.
    pub period_days: i64,
    /// `days_remaining <= attention` escalates to the attention bucket.
    pub attention: i64,
    /// `days_remaining <= urgent` escalates to the urgent bucket.
    pub urgent: i64,
}

impl ControlThresholds {
    pub const fn new(period_days: i64, attention: i64, urgent: i64) -> Self {
        Self {
            period_days,
            attention,
            urgent,
        }
    }
}

/// Per-control thresholds, persisted as an admin-editable configuration
/// document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSchedule {
    pub technical: ControlThresholds,
    pub weighing: ControlThresholds,
    pub tachograph: ControlThresholds,
    pub periodic_inspection: ControlThresholds,
}

impl ControlSchedule {
    pub fn thresholds(&self, control: ControlType) -> ControlThresholds {
        match control {
            ControlType::Technical => self.technical,
            ControlType::Weighing => self.weighing,
            ControlType::Tachograph => self.tachograph,
            ControlType::PeriodicInspection => self.periodic_inspection,
        }
    }

    pub fn set_thresholds(&mut self, control: ControlType, thresholds: ControlThresholds) {
        match control {
            ControlType::Technical => self.technical = thresholds,
            ControlType::Weighing => self.weighing = thresholds,
            ControlType::Tachograph => self.tachograph = thresholds,
            ControlType::PeriodicInspection => self.periodic_inspection = thresholds,
        }
    }
}

impl Default for ControlSchedule {
    fn default() -> Self {
        // Yearly CT/mines, two-yearly tachograph calibration, six-monthly VGP.
        Self {
            technical: ControlThresholds::new(365, 60, 30),
            weighing: ControlThresholds::new(365, 60, 30),
            tachograph: ControlThresholds::new(730, 60, 30),
            periodic_inspection: ControlThresholds::new(182, 30, 15),
        }
    }
}
