//! Field service: boundary geometry and area conversion

use rust_decimal::Decimal;
use serde::Serialize;
use shared::{
    convert_from_square_meters, polygon_centroid, round_area_for_display, validate_field_area,
    validate_field_boundary, AreaUnit, GpsCoordinates, UnitError,
};

use crate::error::{AppError, AppResult};

/// An area expressed in one unit
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AreaMeasurement {
    pub unit: AreaUnit,
    pub symbol: &'static str,
    pub value: Decimal,
    /// Value rounded for display
    pub display: String,
}

/// A unit and its size in square meters
#[derive(Debug, Clone, Serialize)]
pub struct AreaUnitInfo {
    pub unit: AreaUnit,
    pub name: String,
    pub symbol: &'static str,
    pub square_meters: Decimal,
}

/// Field service for geometry queries
pub struct FieldService;

impl FieldService {
    /// Centroid of a field boundary; `None` when there are no vertices
    pub fn centroid(vertices: &[GpsCoordinates]) -> AppResult<Option<GpsCoordinates>> {
        validate_field_boundary(vertices).map_err(|e| AppError::validation("vertices", e))?;
        Ok(polygon_centroid(vertices))
    }

    /// Express a field area (square meters) in the named unit
    pub fn convert_area(area_sq_m: Decimal, unit: &str) -> AppResult<AreaMeasurement> {
        validate_field_area(area_sq_m).map_err(|e| AppError::validation("area_sq_m", e))?;
        let unit: AreaUnit = unit
            .parse()
            .map_err(|e: UnitError| AppError::validation("unit", e.to_string()))?;
        Self::measure(area_sq_m, unit)
    }

    /// Express a field area in every supported unit
    pub fn convert_all(area_sq_m: Decimal) -> AppResult<Vec<AreaMeasurement>> {
        validate_field_area(area_sq_m).map_err(|e| AppError::validation("area_sq_m", e))?;
        AreaUnit::ALL
            .iter()
            .map(|unit| Self::measure(area_sq_m, *unit))
            .collect()
    }

    /// The unit conversion table
    pub fn units() -> Vec<AreaUnitInfo> {
        AreaUnit::ALL
            .iter()
            .map(|unit| AreaUnitInfo {
                unit: *unit,
                name: unit.to_string(),
                symbol: unit.symbol(),
                square_meters: unit.square_meters_per_unit(),
            })
            .collect()
    }

    fn measure(area_sq_m: Decimal, unit: AreaUnit) -> AppResult<AreaMeasurement> {
        let value = convert_from_square_meters(area_sq_m, unit)
            .map_err(|e| AppError::validation("area_sq_m", e.to_string()))?;
        Ok(AreaMeasurement {
            unit,
            symbol: unit.symbol(),
            value,
            display: round_area_for_display(value).to_string(),
        })
    }
}
