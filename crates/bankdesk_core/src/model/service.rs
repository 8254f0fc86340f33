//! Payable bank service record (mobile top-up, utilities, ...).

use serde::{Deserialize, Serialize};

/// Row of the `services` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankService {
    #[serde(rename = "Id")]
    pub id: i64,
    /// Exported as `Service` to stay compatible with existing backup files.
    #[serde(rename = "Service")]
    pub name: String,
    /// Minor currency units collected by the service.
    #[serde(rename = "Balance")]
    pub balance: i64,
}
