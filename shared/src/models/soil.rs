//! Soil health models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Qualitative reading of a soil value against its optimal band
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SoilStatus {
    Low,
    Optimal,
    High,
}

impl std::fmt::Display for SoilStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoilStatus::Low => write!(f, "Low"),
            SoilStatus::Optimal => write!(f, "Optimal"),
            SoilStatus::High => write!(f, "High"),
        }
    }
}

/// Soil properties tracked by the soil health card
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SoilMetric {
    Ph,
    OrganicCarbon,
    ElectricalConductivity,
    Nitrogen,
    Phosphorus,
    Potassium,
    Zinc,
    Iron,
    Manganese,
    Boron,
}

impl SoilMetric {
    /// Metrics whose value can drift with the weather
    pub const WEATHER_SENSITIVE: [SoilMetric; 5] = [
        SoilMetric::Nitrogen,
        SoilMetric::Phosphorus,
        SoilMetric::Potassium,
        SoilMetric::Ph,
        SoilMetric::OrganicCarbon,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SoilMetric::Ph => "pH",
            SoilMetric::OrganicCarbon => "Organic Carbon",
            SoilMetric::ElectricalConductivity => "Electrical Conductivity",
            SoilMetric::Nitrogen => "Nitrogen (N)",
            SoilMetric::Phosphorus => "Phosphorus (P)",
            SoilMetric::Potassium => "Potassium (K)",
            SoilMetric::Zinc => "Zinc (Zn)",
            SoilMetric::Iron => "Iron (Fe)",
            SoilMetric::Manganese => "Manganese (Mn)",
            SoilMetric::Boron => "Boron (B)",
        }
    }

    /// Optimal band `(low, high)`; values below `low` are Low, above `high` are High
    pub fn optimal_range(&self) -> (Decimal, Decimal) {
        match self {
            SoilMetric::Nitrogen => (Decimal::from(250), Decimal::from(350)),
            SoilMetric::Phosphorus => (Decimal::from(12), Decimal::from(30)),
            SoilMetric::Potassium => (Decimal::from(150), Decimal::from(300)),
            SoilMetric::Ph => (Decimal::new(60, 1), Decimal::new(75, 1)),
            SoilMetric::OrganicCarbon => (Decimal::new(75, 2), Decimal::new(15, 1)),
            SoilMetric::ElectricalConductivity => (Decimal::new(2, 1), Decimal::ONE),
            SoilMetric::Zinc => (Decimal::new(6, 1), Decimal::new(15, 1)),
            SoilMetric::Iron => (Decimal::new(45, 1), Decimal::from(20)),
            SoilMetric::Manganese => (Decimal::from(2), Decimal::from(10)),
            SoilMetric::Boron => (Decimal::new(5, 1), Decimal::from(2)),
        }
    }

    pub fn classify(&self, value: Decimal) -> SoilStatus {
        let (low, high) = self.optimal_range();
        if value < low {
            SoilStatus::Low
        } else if value > high {
            SoilStatus::High
        } else {
            SoilStatus::Optimal
        }
    }
}

/// A single line of the soil health card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SoilReading {
    pub metric: SoilMetric,
    pub name: String,
    /// Display value with unit, e.g. "210 kg/ha"
    pub value: String,
    pub status: SoilStatus,
}

impl SoilReading {
    /// Build a reading whose status follows from `amount`
    pub fn new(metric: SoilMetric, amount: Decimal, unit_suffix: &str) -> Self {
        Self {
            metric,
            name: metric.label().to_string(),
            value: format!("{}{}", amount, unit_suffix),
            status: metric.classify(amount),
        }
    }
}

/// Soil health card grouped the way the dashboard shows it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SoilHealth {
    pub general: Vec<SoilReading>,
    pub macro_nutrients: Vec<SoilReading>,
    pub micro_nutrients: Vec<SoilReading>,
}

impl SoilHealth {
    pub fn readings(&self) -> impl Iterator<Item = &SoilReading> {
        self.general
            .iter()
            .chain(self.macro_nutrients.iter())
            .chain(self.micro_nutrients.iter())
    }

    pub fn reading(&self, metric: SoilMetric) -> Option<&SoilReading> {
        self.readings().find(|r| r.metric == metric)
    }

    pub fn reading_mut(&mut self, metric: SoilMetric) -> Option<&mut SoilReading> {
        self.general
            .iter_mut()
            .chain(self.macro_nutrients.iter_mut())
            .chain(self.micro_nutrients.iter_mut())
            .find(|r| r.metric == metric)
    }
}

/// Reference soil record for the demo field
///
/// Returns a fresh value on every call so adjusted copies never share storage
/// with it.
pub fn baseline_soil_health() -> SoilHealth {
    SoilHealth {
        general: vec![
            SoilReading::new(SoilMetric::Ph, Decimal::new(58, 1), ""),
            SoilReading::new(SoilMetric::OrganicCarbon, Decimal::new(45, 2), "%"),
            SoilReading::new(SoilMetric::ElectricalConductivity, Decimal::new(32, 2), " dS/m"),
        ],
        macro_nutrients: vec![
            SoilReading::new(SoilMetric::Nitrogen, Decimal::from(210), " kg/ha"),
            SoilReading::new(SoilMetric::Phosphorus, Decimal::from(18), " kg/ha"),
            SoilReading::new(SoilMetric::Potassium, Decimal::from(120), " kg/ha"),
        ],
        micro_nutrients: vec![
            SoilReading::new(SoilMetric::Zinc, Decimal::new(45, 2), " ppm"),
            SoilReading::new(SoilMetric::Iron, Decimal::new(52, 1), " ppm"),
            SoilReading::new(SoilMetric::Manganese, Decimal::new(31, 1), " ppm"),
            SoilReading::new(SoilMetric::Boron, Decimal::new(4, 1), " ppm"),
        ],
    }
}
