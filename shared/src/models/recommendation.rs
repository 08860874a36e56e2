//! Agronomic recommendation models

use serde::{Deserialize, Serialize};

/// Recommendations shown on the advisory panel
///
/// Every field is always populated; weather signals only choose which text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendations {
    pub fertilizer: String,
    pub zinc: String,
    pub ph: String,
    pub irrigation: String,
    pub pest: String,
}
