//! Domain models for the FieldSense platform

mod analysis;
mod forecast;
mod recommendation;
mod session;
mod soil;

pub use analysis::*;
pub use forecast::*;
pub use recommendation::*;
pub use session::*;
pub use soil::*;
