//! WebAssembly module for the FieldSense field advisory platform
//!
//! Provides client-side computation for:
//! - Field centroid resolution from a drawn boundary
//! - Weekly weather analysis against the baseline soil record
//! - Area unit conversion for the field summary

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{analyze_weather, polygon_centroid, round_area_for_display, AreaUnit};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Forecast payload accepted from the page: either a bare day list or a
/// full forecast object
#[derive(Deserialize)]
#[serde(untagged)]
enum ForecastInput {
    Days(Vec<DailyForecast>),
    Forecast(WeatherForecast),
}

impl ForecastInput {
    fn into_days(self) -> Vec<DailyForecast> {
        match self {
            ForecastInput::Days(days) => days,
            ForecastInput::Forecast(forecast) => forecast.daily,
        }
    }
}

fn centroid_json(vertices_json: &str) -> Result<String, String> {
    let vertices: Vec<GpsCoordinates> = serde_json::from_str(vertices_json)
        .map_err(|e| format!("Invalid vertices JSON: {}", e))?;
    validate_field_boundary(&vertices)?;

    serde_json::to_string(&polygon_centroid(&vertices)).map_err(|e| e.to_string())
}

fn analysis_for(forecast_json: &str) -> Result<SoilAnalysis, String> {
    let days = serde_json::from_str::<ForecastInput>(forecast_json)
        .map_err(|e| format!("Invalid forecast JSON: {}", e))?
        .into_days();
    validate_forecast(&days)?;

    Ok(analyze_weather(&days, &baseline_soil_health()))
}

fn area_in_unit(area_sq_m: f64, unit: &str) -> Result<f64, String> {
    let unit = AreaUnit::from_str(unit).map_err(|e| e.to_string())?;
    let area = Decimal::try_from(area_sq_m).map_err(|_| "Area must be a finite number".to_string())?;
    validate_field_area(area)?;

    let converted = shared::convert_from_square_meters(area, unit).map_err(|e| e.to_string())?;
    round_area_for_display(converted)
        .to_f64()
        .ok_or_else(|| "Converted area is out of range".to_string())
}

/// Centroid of a field boundary given as a JSON array of coordinates
///
/// Returns `"null"` for an empty boundary.
#[wasm_bindgen]
pub fn resolve_centroid(vertices_json: &str) -> Result<String, JsValue> {
    centroid_json(vertices_json).map_err(|e| JsValue::from_str(&e))
}

/// Analyze a forecast week against the baseline soil record
#[wasm_bindgen]
pub fn analyze_forecast(forecast_json: &str) -> Result<String, JsValue> {
    let analysis = analysis_for(forecast_json).map_err(|e| JsValue::from_str(&e))?;

    for diagnostic in &analysis.diagnostics {
        web_sys::console::warn_1(&JsValue::from_str(diagnostic));
    }

    serde_json::to_string(&analysis).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Convert an area in square meters to the named unit, rounded for display
#[wasm_bindgen]
pub fn convert_area(area_sq_m: f64, unit: &str) -> Result<f64, JsValue> {
    area_in_unit(area_sq_m, unit).map_err(|e| JsValue::from_str(&e))
}

/// Baseline soil record as JSON
#[wasm_bindgen]
pub fn baseline_soil_json() -> String {
    serde_json::to_string(&baseline_soil_health()).unwrap_or_default()
}
