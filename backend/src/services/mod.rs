//! Business logic services for the FieldSense platform

pub mod field;
pub mod session;
pub mod weather;

pub use field::FieldService;
pub use session::{SessionLimits, SessionService, SessionStore};
pub use weather::WeatherService;
