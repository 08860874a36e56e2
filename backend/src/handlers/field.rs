//! HTTP handlers for field geometry endpoints

use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::GpsCoordinates;
use validator::Validate;

use crate::error::AppResult;
use crate::services::field::{AreaMeasurement, AreaUnitInfo, FieldService};

/// Field boundary as drawn on the map
#[derive(Debug, Deserialize, Validate)]
pub struct CentroidInput {
    #[validate(length(max = 1000))]
    pub vertices: Vec<GpsCoordinates>,
}

#[derive(Debug, Serialize)]
pub struct CentroidResponse {
    pub centroid: Option<GpsCoordinates>,
}

/// Compute the centroid of a field boundary
pub async fn compute_centroid(Json(input): Json<CentroidInput>) -> AppResult<Json<CentroidResponse>> {
    input.validate()?;
    let centroid = FieldService::centroid(&input.vertices)?;
    Ok(Json(CentroidResponse { centroid }))
}

/// Area conversion request
#[derive(Debug, Deserialize, Validate)]
pub struct ConvertAreaInput {
    pub area_sq_m: Decimal,
    /// Target unit; every unit is returned when omitted
    #[validate(length(min = 1, max = 32))]
    pub unit: Option<String>,
}

/// Convert a field area into one or all supported units
pub async fn convert_area(
    Json(input): Json<ConvertAreaInput>,
) -> AppResult<Json<Vec<AreaMeasurement>>> {
    input.validate()?;
    let measurements = match input.unit.as_deref() {
        Some(unit) => vec![FieldService::convert_area(input.area_sq_m, unit)?],
        None => FieldService::convert_all(input.area_sq_m)?,
    };
    Ok(Json(measurements))
}

/// List supported area units
pub async fn list_units() -> Json<Vec<AreaUnitInfo>> {
    Json(FieldService::units())
}
