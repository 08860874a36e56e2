//! Weather analysis result models

use serde::{Deserialize, Serialize};

use super::{Recommendations, SoilHealth};

/// Weekly signals derived from a forecast
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeatherSignals {
    /// Days that count as heavy rain
    pub heavy_rain_days: u32,
    /// Longest run of consecutive dry, hot days
    pub max_heat_streak: u32,
    /// Days with humidity at or above the pest-pressure threshold
    pub humid_days: u32,
}

impl WeatherSignals {
    pub fn has_heavy_rain(&self) -> bool {
        self.heavy_rain_days >= 1
    }

    pub fn has_heat_streak(&self) -> bool {
        self.max_heat_streak >= 3
    }

    pub fn has_humid_days(&self) -> bool {
        self.humid_days >= 1
    }
}

/// Output of the weather-to-agronomy analyzer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoilAnalysis {
    /// Distinct alerts in the order they were raised, never empty
    pub alerts: Vec<String>,
    pub signals: WeatherSignals,
    pub adjusted_soil: SoilHealth,
    pub recommendations: Recommendations,
    /// Soil values that carried no number and were read as zero
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}
