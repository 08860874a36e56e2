//! HTTP request handlers

mod field;
mod health;
mod session;
mod weather;

pub use field::*;
pub use health::*;
pub use session::*;
pub use weather::*;
