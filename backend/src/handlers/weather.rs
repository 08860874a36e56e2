//! HTTP handlers for forecast and soil analysis endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    baseline_soil_health, validate_coordinates, DailyForecast, GpsCoordinates, SoilAnalysis,
    SoilHealth, WeatherForecast,
};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Query parameters for a location forecast
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

/// Get the one-week forecast for a coordinate
pub async fn get_weather_forecast(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<WeatherForecast>> {
    let location = GpsCoordinates::new(query.latitude, query.longitude);
    validate_coordinates(&location).map_err(|e| AppError::validation("location", e))?;

    let forecast = state.weather.get_forecast(location).await?;
    Ok(Json(forecast))
}

/// Get the reference soil record
pub async fn get_baseline_soil() -> Json<SoilHealth> {
    Json(baseline_soil_health())
}

/// Forecast supplied by the caller for analysis
#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeInput {
    #[validate(length(min = 1, max = 16))]
    pub forecast: Vec<DailyForecast>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub baseline: SoilHealth,
    #[serde(flatten)]
    pub analysis: SoilAnalysis,
}

/// Analyze a forecast week against the reference soil record
pub async fn analyze_forecast(
    State(state): State<AppState>,
    Json(input): Json<AnalyzeInput>,
) -> AppResult<Json<AnalyzeResponse>> {
    input.validate()?;
    let analysis = state.weather.analyze(&input.forecast)?;
    Ok(Json(AnalyzeResponse {
        baseline: baseline_soil_health(),
        analysis,
    }))
}
