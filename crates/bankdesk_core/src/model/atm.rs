//! ATM location record.

use serde::{Deserialize, Serialize};

/// Row of the `atms` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Atm {
    pub id: i64,
    pub city: String,
    pub district: String,
    pub street: String,
}

/// Insert request for an ATM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAtm {
    pub city: String,
    pub district: String,
    pub street: String,
}

impl NewAtm {
    pub fn new(
        city: impl Into<String>,
        district: impl Into<String>,
        street: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            district: district.into(),
            street: street.into(),
        }
    }
}
