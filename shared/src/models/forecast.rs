//! Weather forecast models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::GpsCoordinates;

/// Number of forecast days the analyzer looks at
pub const FORECAST_DAYS: usize = 7;

/// Current conditions reported alongside a forecast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentConditions {
    pub timestamp: DateTime<Utc>,
    pub temperature_celsius: Decimal,
    pub humidity_percent: Option<i32>,
    pub wind_speed_mps: Option<Decimal>,
    pub conditions: Option<String>,
}

/// One calendar day of forecast weather
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyForecast {
    pub timestamp: DateTime<Utc>,
    pub temp_min_celsius: Decimal,
    pub temp_max_celsius: Decimal,
    /// Probability of precipitation (0-1)
    pub pop: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain_mm: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed_mps: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_percent: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
}

impl DailyForecast {
    /// Rainfall for the day, treating a missing amount as dry
    pub fn rainfall(&self) -> Decimal {
        self.rain_mm.unwrap_or(Decimal::ZERO)
    }
}

/// Forecast for a field location, days in chronological order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherForecast {
    pub location: GpsCoordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<CurrentConditions>,
    pub daily: Vec<DailyForecast>,
}

impl WeatherForecast {
    /// Drop any days past the first week
    pub fn truncated_to_week(mut self) -> Self {
        self.daily.truncate(FORECAST_DAYS);
        self
    }
}
