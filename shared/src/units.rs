//! Land area units
//!
//! Field areas arrive from the map selector in square meters. Every unit is
//! described by how many square meters one of it covers.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decimal places used when showing a converted area
pub const AREA_DISPLAY_DECIMALS: u32 = 2;

/// Supported area units
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AreaUnit {
    SquareMeters,
    SquareFeet,
    Acres,
    Hectares,
    /// Regional South Asian unit (Bengal/Assam measure)
    Bigha,
    /// One twentieth of a bigha
    Katha,
    /// Thai unit: 1 rai = 1,600 m²
    Rai,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitError {
    #[error("Unknown area unit: {0}")]
    Unknown(String),

    #[error("Area {0} is too large to convert")]
    OutOfRange(Decimal),
}

impl AreaUnit {
    pub const ALL: [AreaUnit; 7] = [
        AreaUnit::SquareMeters,
        AreaUnit::SquareFeet,
        AreaUnit::Acres,
        AreaUnit::Hectares,
        AreaUnit::Bigha,
        AreaUnit::Katha,
        AreaUnit::Rai,
    ];

    /// Square meters covered by one unit
    pub fn square_meters_per_unit(&self) -> Decimal {
        match self {
            AreaUnit::SquareMeters => Decimal::ONE,
            AreaUnit::SquareFeet => Decimal::new(9_290_304, 8),
            AreaUnit::Acres => Decimal::new(40_468_564_224, 7),
            AreaUnit::Hectares => Decimal::new(10_000, 0),
            AreaUnit::Bigha => Decimal::new(133_780, 2),
            AreaUnit::Katha => Decimal::new(668_900, 4),
            AreaUnit::Rai => Decimal::new(1_600, 0),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            AreaUnit::SquareMeters => "m²",
            AreaUnit::SquareFeet => "ft²",
            AreaUnit::Acres => "ac",
            AreaUnit::Hectares => "ha",
            AreaUnit::Bigha => "bigha",
            AreaUnit::Katha => "katha",
            AreaUnit::Rai => "rai",
        }
    }
}

impl std::fmt::Display for AreaUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AreaUnit::SquareMeters => write!(f, "Square meters"),
            AreaUnit::SquareFeet => write!(f, "Square feet"),
            AreaUnit::Acres => write!(f, "Acres"),
            AreaUnit::Hectares => write!(f, "Hectares"),
            AreaUnit::Bigha => write!(f, "Bigha"),
            AreaUnit::Katha => write!(f, "Katha"),
            AreaUnit::Rai => write!(f, "Rai"),
        }
    }
}

impl FromStr for AreaUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "square_meters" | "square_meter" | "sq_m" | "sqm" | "m2" | "m²" => {
                Ok(AreaUnit::SquareMeters)
            }
            "square_feet" | "square_foot" | "sq_ft" | "sqft" | "ft2" | "ft²" => {
                Ok(AreaUnit::SquareFeet)
            }
            "acres" | "acre" | "ac" => Ok(AreaUnit::Acres),
            "hectares" | "hectare" | "ha" => Ok(AreaUnit::Hectares),
            "bigha" | "bighas" => Ok(AreaUnit::Bigha),
            "katha" | "kathas" | "kattha" => Ok(AreaUnit::Katha),
            "rai" => Ok(AreaUnit::Rai),
            _ => Err(UnitError::Unknown(s.to_string())),
        }
    }
}

/// Express an area given in square meters in `unit`
pub fn convert_from_square_meters(area_sq_m: Decimal, unit: AreaUnit) -> Result<Decimal, UnitError> {
    area_sq_m
        .checked_div(unit.square_meters_per_unit())
        .ok_or(UnitError::OutOfRange(area_sq_m))
}

/// Convert an area between two units
pub fn convert_area(value: Decimal, from: AreaUnit, to: AreaUnit) -> Result<Decimal, UnitError> {
    if from == to {
        return Ok(value);
    }
    let area_sq_m = value
        .checked_mul(from.square_meters_per_unit())
        .ok_or(UnitError::OutOfRange(value))?;
    convert_from_square_meters(area_sq_m, to)
}

/// Round a converted area for display (two decimals, half away from zero)
pub fn round_area_for_display(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(AREA_DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(AREA_DISPLAY_DECIMALS);
    rounded
}
