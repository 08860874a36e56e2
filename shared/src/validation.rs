//! Validation utilities for field and forecast input
//!
//! Degenerate fields (no vertices, zero area) are valid input; they only mean
//! there is nothing to analyze yet. These checks reject values that cannot be
//! real measurements.

use rust_decimal::Decimal;

use crate::models::DailyForecast;
use crate::types::GpsCoordinates;

/// Upper bound on polygon vertices accepted from the map selector
pub const MAX_FIELD_VERTICES: usize = 1_000;

/// Largest field area accepted, in square meters (one million km²)
pub fn max_field_area_sq_m() -> Decimal {
    Decimal::from(1_000_000_000_000i64)
}

// ============================================================================
// Geographic Validations
// ============================================================================

/// Validate latitude is within -90..=90 and longitude within -180..=180
pub fn validate_coordinates(coords: &GpsCoordinates) -> Result<(), &'static str> {
    if coords.latitude < Decimal::from(-90) || coords.latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if coords.longitude < Decimal::from(-180) || coords.longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate every vertex of a field boundary
pub fn validate_field_boundary(vertices: &[GpsCoordinates]) -> Result<(), &'static str> {
    if vertices.len() > MAX_FIELD_VERTICES {
        return Err("Field boundary has too many vertices");
    }
    vertices.iter().try_for_each(validate_coordinates)
}

/// Validate a measured field area in square meters
pub fn validate_field_area(area_sq_m: Decimal) -> Result<(), &'static str> {
    if area_sq_m < Decimal::ZERO {
        return Err("Field area cannot be negative");
    }
    if area_sq_m > max_field_area_sq_m() {
        return Err("Field area is larger than any real field");
    }
    Ok(())
}

// ============================================================================
// Forecast Validations
// ============================================================================

/// Validate the ranges of a single forecast day
pub fn validate_forecast_day(day: &DailyForecast) -> Result<(), &'static str> {
    if day.pop < Decimal::ZERO || day.pop > Decimal::ONE {
        return Err("Precipitation probability must be between 0 and 1");
    }
    if day.temp_min_celsius > day.temp_max_celsius {
        return Err("Minimum temperature cannot exceed maximum temperature");
    }
    if day.rain_mm.map_or(false, |r| r < Decimal::ZERO) {
        return Err("Rainfall cannot be negative");
    }
    if day.wind_speed_mps.map_or(false, |w| w < Decimal::ZERO) {
        return Err("Wind speed cannot be negative");
    }
    if day.humidity_percent.map_or(false, |h| !(0..=100).contains(&h)) {
        return Err("Humidity must be between 0 and 100%");
    }
    Ok(())
}

/// Validate a forecast sequence is chronological and every day is in range
pub fn validate_forecast(days: &[DailyForecast]) -> Result<(), &'static str> {
    days.iter().try_for_each(validate_forecast_day)?;
    if days.windows(2).any(|w| w[0].timestamp >= w[1].timestamp) {
        return Err("Forecast days must be in chronological order");
    }
    Ok(())
}
