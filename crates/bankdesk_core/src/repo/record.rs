//! Row decoding for every exportable table.
//!
//! # Invariants
//! - `SELECT_SQL` returns rows in primary-key order so snapshots are stable.
//! - Decoders read columns by name; a type mismatch surfaces as a scan error.

use crate::model::account::{Client, Manager};
use crate::model::atm::Atm;
use crate::model::card::Card;
use crate::model::entity::EntityKind;
use crate::model::service::BankService;
use rusqlite::Row;

/// A flat record that can be fetched in full from its table.
pub trait Record: Sized {
    const KIND: EntityKind;
    const SELECT_SQL: &'static str;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl Record for Manager {
    const KIND: EntityKind = EntityKind::Managers;
    const SELECT_SQL: &'static str = "SELECT id, name, surname, login, password
        FROM managers
        ORDER BY id;";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            surname: row.get("surname")?,
            login: row.get("login")?,
            password: row.get("password")?,
        })
    }
}

impl Record for Client {
    const KIND: EntityKind = EntityKind::Clients;
    const SELECT_SQL: &'static str = "SELECT id, name, surname, login, password
        FROM clients
        ORDER BY id;";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            surname: row.get("surname")?,
            login: row.get("login")?,
            password: row.get("password")?,
        })
    }
}

impl Record for Card {
    const KIND: EntityKind = EntityKind::Cards;
    const SELECT_SQL: &'static str =
        "SELECT id, pan, pin, balance, holderName, cvv, validity, client_id
        FROM clients_cards
        ORDER BY id;";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            pan: row.get("pan")?,
            pin: row.get("pin")?,
            balance: row.get("balance")?,
            holder_name: row.get("holderName")?,
            cvv: row.get("cvv")?,
            validity: row.get("validity")?,
            client_id: row.get("client_id")?,
        })
    }
}

impl Record for Atm {
    const KIND: EntityKind = EntityKind::Atms;
    const SELECT_SQL: &'static str = "SELECT id, city, district, street
        FROM atms
        ORDER BY id;";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            city: row.get("city")?,
            district: row.get("district")?,
            street: row.get("street")?,
        })
    }
}

impl Record for BankService {
    const KIND: EntityKind = EntityKind::Services;
    const SELECT_SQL: &'static str = "SELECT id, name, balance
        FROM services
        ORDER BY id;";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            balance: row.get("balance")?,
        })
    }
}
