//! Payment card record.

use serde::{Deserialize, Serialize};

/// Row of the `clients_cards` table.
///
/// `client_id` is a reference, not ownership: client lifecycle is independent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "PAN")]
    pub pan: i64,
    #[serde(rename = "PIN")]
    pub pin: i64,
    /// Minor currency units.
    #[serde(rename = "Balance")]
    pub balance: i64,
    #[serde(rename = "HolderName")]
    pub holder_name: String,
    #[serde(rename = "CVV")]
    pub cvv: i64,
    /// Encoded expiry, `MMYY` as an integer (e.g. `222` for 02/22).
    #[serde(rename = "Validity")]
    pub validity: i64,
    #[serde(rename = "ClientId")]
    pub client_id: i64,
}

/// Insert request for a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    pub pan: i64,
    pub pin: i64,
    pub balance: i64,
    pub holder_name: String,
    pub cvv: i64,
    pub validity: i64,
    pub client_id: i64,
}
