//! Shared types and computations for the FieldSense field advisory platform
//!
//! This crate contains the pure agronomic core (field geometry, weather-driven
//! soil analysis, area units) shared between the backend, the browser front
//! end (via WASM), and tests.

pub mod analysis;
pub mod geometry;
pub mod models;
pub mod types;
pub mod units;
pub mod validation;

pub use analysis::*;
pub use geometry::*;
pub use models::*;
pub use types::*;
pub use units::*;
pub use validation::*;
