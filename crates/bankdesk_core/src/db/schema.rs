//! Ordered schema statements and their one-shot executor.
//!
//! # Responsibility
//! - Carry table definitions and seed rows as an explicit value.
//! - Apply DDL first, then seed DML, in list order.
//!
//! # Invariants
//! - The first failing statement aborts initialization.
//! - Statements already applied before a failure are NOT rolled back.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

const MANAGERS_DDL: &str = include_str!("sql/managers.sql");
const CLIENTS_DDL: &str = include_str!("sql/clients.sql");
const CLIENTS_CARDS_DDL: &str = include_str!("sql/clients_cards.sql");
const ATMS_DDL: &str = include_str!("sql/atms.sql");
const SERVICES_DDL: &str = include_str!("sql/services.sql");
const ATMS_SEED: &str = include_str!("sql/seed_atms.sql");
const SERVICES_SEED: &str = include_str!("sql/seed_services.sql");

/// Table definitions plus seed rows, consumed once at initialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub ddl: Vec<String>,
    pub seed: Vec<String>,
}

impl Schema {
    pub fn new(ddl: Vec<String>, seed: Vec<String>) -> Self {
        Self { ddl, seed }
    }

    /// Built-in back office tables with ATM and service seed rows.
    ///
    /// Account rows are not seeded: stored passwords must be salted hashes,
    /// so accounts are created through repository inserts instead.
    pub fn banking() -> Self {
        Self {
            ddl: [
                MANAGERS_DDL,
                CLIENTS_DDL,
                CLIENTS_CARDS_DDL,
                ATMS_DDL,
                SERVICES_DDL,
            ]
            .iter()
            .map(|sql| (*sql).to_string())
            .collect(),
            seed: [ATMS_SEED, SERVICES_SEED]
                .iter()
                .map(|sql| (*sql).to_string())
                .collect(),
        }
    }

    /// Statements in application order: every DDL entry, then every seed entry.
    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.ddl.iter().chain(self.seed.iter()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ddl.len() + self.seed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Applies every schema statement once, in order.
///
/// # Errors
/// - Returns [`DbError::Schema`] with the failing statement index. Earlier
///   statements remain applied.
pub fn apply_schema(conn: &Connection, schema: &Schema) -> DbResult<()> {
    for (index, sql) in schema.statements().enumerate() {
        if let Err(err) = conn.execute_batch(sql) {
            error!(
                "event=schema_apply module=db status=error index={} total={} error={}",
                index,
                schema.len(),
                err
            );
            return Err(DbError::Schema { index, source: err });
        }
    }

    info!(
        "event=schema_apply module=db status=ok statements={}",
        schema.len()
    );
    Ok(())
}
