//! Back office repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Fetch whole tables as typed records.
//! - Insert rows inside begin/exec/commit transactions.
//! - Answer sign-in, PAN allocation and client lookup queries.
//!
//! # Invariants
//! - Fetches either return every row or an error; never a partial vector.
//! - An insert whose exec step fails is rolled back before the error returns.
//! - `next_pan` is a plain read: two callers may receive the same value.

use crate::auth::{self, AuthError};
use crate::model::account::{Client, Manager, NewAccount, Role};
use crate::model::atm::{Atm, NewAtm};
use crate::model::card::{Card, NewCard};
use crate::model::service::BankService;
use crate::repo::record::Record;
use log::{debug, warn};
use rusqlite::{named_params, Connection, Params, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Step of an insert transaction that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStage {
    Begin,
    Exec,
    Commit,
}

impl Display for TxStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Begin => f.write_str("begin"),
            Self::Exec => f.write_str("exec"),
            Self::Commit => f.write_str("commit"),
        }
    }
}

/// Repository error for store access and account rules.
#[derive(Debug)]
pub enum RepoError {
    /// Preparing or executing a query failed.
    Query(rusqlite::Error),
    /// A row could not be decoded into its record.
    Scan(rusqlite::Error),
    /// Advancing the result cursor failed.
    Cursor(rusqlite::Error),
    Transaction {
        stage: TxStage,
        source: rusqlite::Error,
    },
    /// Account exists but the submitted password does not match.
    PasswordMismatch,
    /// PAN allocation needs at least one issued card.
    NoCardsIssued,
    InvalidData(String),
    Auth(AuthError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query(err) => write!(f, "query failed: {err}"),
            Self::Scan(err) => write!(f, "row decode failed: {err}"),
            Self::Cursor(err) => write!(f, "result cursor failed: {err}"),
            Self::Transaction { stage, source } => {
                write!(f, "transaction {stage} failed: {source}")
            }
            Self::PasswordMismatch => write!(f, "password is not valid"),
            Self::NoCardsIssued => write!(f, "no card has been issued yet"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Auth(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Query(err) | Self::Scan(err) | Self::Cursor(err) => Some(err),
            Self::Transaction { source, .. } => Some(source),
            Self::Auth(err) => Some(err),
            Self::PasswordMismatch | Self::NoCardsIssued | Self::InvalidData(_) => None,
        }
    }
}

impl From<AuthError> for RepoError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::MalformedHash(err) => {
                Self::InvalidData(format!("stored password is not a PHC hash: {err}"))
            }
            other => Self::Auth(other),
        }
    }
}

/// Repository interface for back office tables.
pub trait BankRepository {
    /// Reads every row of `T`'s table in primary-key order.
    fn fetch_all<T: Record>(&self) -> RepoResult<Vec<T>>;

    fn managers(&self) -> RepoResult<Vec<Manager>> {
        self.fetch_all()
    }

    fn clients(&self) -> RepoResult<Vec<Client>> {
        self.fetch_all()
    }

    fn cards(&self) -> RepoResult<Vec<Card>> {
        self.fetch_all()
    }

    fn atms(&self) -> RepoResult<Vec<Atm>> {
        self.fetch_all()
    }

    fn services(&self) -> RepoResult<Vec<BankService>> {
        self.fetch_all()
    }

    /// Inserts a manager and returns its row id.
    fn insert_manager(&self, account: &NewAccount) -> RepoResult<i64>;
    /// Inserts a client and returns its row id.
    fn insert_client(&self, account: &NewAccount) -> RepoResult<i64>;
    /// Issues a card; the store rejects unknown `client_id` values.
    fn insert_card(&self, card: &NewCard) -> RepoResult<i64>;
    fn insert_atm(&self, atm: &NewAtm) -> RepoResult<i64>;
    /// Registers a service with a zero balance.
    fn insert_service(&self, name: &str) -> RepoResult<i64>;

    /// Largest issued PAN plus one. Not reserved.
    fn next_pan(&self) -> RepoResult<i64>;

    /// Checks credentials for `role`.
    ///
    /// - `Ok(false)` when no account has this login.
    /// - `Err(RepoError::PasswordMismatch)` when the password is wrong.
    /// - `Ok(true)` when the password verifies.
    fn sign_in(&self, role: Role, login: &str, password: &str) -> RepoResult<bool>;

    /// Returns `Some(id)` when a client with this id exists.
    fn client_id_exists(&self, id: i64) -> RepoResult<Option<i64>>;
    /// Returns `Some(login)` when a client with this login exists.
    fn client_login_exists(&self, login: &str) -> RepoResult<Option<String>>;
    /// Returns `(name, surname)` of a client.
    fn client_full_name(&self, id: i64) -> RepoResult<Option<(String, String)>>;
}

/// SQLite-backed back office repository.
pub struct SqliteBankRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBankRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn insert_in_tx<P: Params>(&self, table: &str, sql: &str, params: P) -> RepoResult<i64> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred).map_err(
            |source| RepoError::Transaction {
                stage: TxStage::Begin,
                source,
            },
        )?;

        let row_id = match tx.execute(sql, params) {
            Ok(_) => tx.last_insert_rowid(),
            Err(source) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(
                        "event=repo_insert module=repo status=rollback_failed table={} error={}",
                        table, rollback_err
                    );
                }
                return Err(RepoError::Transaction {
                    stage: TxStage::Exec,
                    source,
                });
            }
        };

        tx.commit().map_err(|source| RepoError::Transaction {
            stage: TxStage::Commit,
            source,
        })?;

        debug!(
            "event=repo_insert module=repo status=ok table={} row_id={}",
            table, row_id
        );
        Ok(row_id)
    }

    fn query_first<T, P: Params>(
        &self,
        sql: &str,
        params: P,
        parse: impl FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    ) -> RepoResult<Option<T>> {
        let mut stmt = self.conn.prepare(sql).map_err(RepoError::Query)?;
        let mut rows = stmt.query(params).map_err(RepoError::Query)?;
        if let Some(row) = rows.next().map_err(RepoError::Cursor)? {
            let value = parse(row).map_err(RepoError::Scan)?;
            return Ok(Some(value));
        }

        Ok(None)
    }

    fn insert_account(&self, table: &'static str, account: &NewAccount) -> RepoResult<i64> {
        self.insert_in_tx(
            table,
            &format!(
                "INSERT INTO {table} (name, surname, login, password)
                 VALUES (:name, :surname, :login, :password);"
            ),
            named_params! {
                ":name": account.name.as_str(),
                ":surname": account.surname.as_str(),
                ":login": account.login.as_str(),
                ":password": account.password_hash.as_str(),
            },
        )
    }
}

impl BankRepository for SqliteBankRepository<'_> {
    fn fetch_all<T: Record>(&self) -> RepoResult<Vec<T>> {
        let mut stmt = self.conn.prepare(T::SELECT_SQL).map_err(RepoError::Query)?;
        let mut rows = stmt.query([]).map_err(RepoError::Query)?;
        let mut records = Vec::new();

        while let Some(row) = rows.next().map_err(RepoError::Cursor)? {
            records.push(T::from_row(row).map_err(RepoError::Scan)?);
        }

        Ok(records)
    }

    fn insert_manager(&self, account: &NewAccount) -> RepoResult<i64> {
        self.insert_account("managers", account)
    }

    fn insert_client(&self, account: &NewAccount) -> RepoResult<i64> {
        self.insert_account("clients", account)
    }

    fn insert_card(&self, card: &NewCard) -> RepoResult<i64> {
        self.insert_in_tx(
            "clients_cards",
            "INSERT INTO clients_cards (pan, pin, balance, holderName, cvv, validity, client_id)
             VALUES (:pan, :pin, :balance, :holderName, :cvv, :validity, :clientId);",
            named_params! {
                ":pan": card.pan,
                ":pin": card.pin,
                ":balance": card.balance,
                ":holderName": card.holder_name.as_str(),
                ":cvv": card.cvv,
                ":validity": card.validity,
                ":clientId": card.client_id,
            },
        )
    }

    fn insert_atm(&self, atm: &NewAtm) -> RepoResult<i64> {
        self.insert_in_tx(
            "atms",
            "INSERT INTO atms (city, district, street)
             VALUES (:city, :district, :street);",
            named_params! {
                ":city": atm.city.as_str(),
                ":district": atm.district.as_str(),
                ":street": atm.street.as_str(),
            },
        )
    }

    fn insert_service(&self, name: &str) -> RepoResult<i64> {
        self.insert_in_tx(
            "services",
            "INSERT INTO services (name, balance) VALUES (:name, :balance);",
            named_params! {
                ":name": name,
                ":balance": 0_i64,
            },
        )
    }

    fn next_pan(&self) -> RepoResult<i64> {
        let last_pan = self
            .query_first("SELECT MAX(pan) FROM clients_cards;", [], |row| {
                row.get::<_, Option<i64>>(0)
            })?
            .flatten()
            .ok_or(RepoError::NoCardsIssued)?;

        last_pan
            .checked_add(1)
            .ok_or_else(|| RepoError::InvalidData(format!("PAN {last_pan} cannot be incremented")))
    }

    fn sign_in(&self, role: Role, login: &str, password: &str) -> RepoResult<bool> {
        let sql = match role {
            Role::Manager => "SELECT password FROM managers WHERE login = ?1;",
            Role::Client => "SELECT password FROM clients WHERE login = ?1;",
        };

        let Some(stored) = self.query_first(sql, [login], |row| row.get::<_, String>(0))? else {
            auth::verify_against_dummy(password);
            return Ok(false);
        };

        if auth::verify_password(password, &stored)? {
            Ok(true)
        } else {
            debug!("event=sign_in module=repo status=mismatch role={role:?}");
            Err(RepoError::PasswordMismatch)
        }
    }

    fn client_id_exists(&self, id: i64) -> RepoResult<Option<i64>> {
        self.query_first("SELECT id FROM clients WHERE id = ?1;", [id], |row| {
            row.get(0)
        })
    }

    fn client_login_exists(&self, login: &str) -> RepoResult<Option<String>> {
        self.query_first(
            "SELECT login FROM clients WHERE login = ?1;",
            [login],
            |row| row.get(0),
        )
    }

    fn client_full_name(&self, id: i64) -> RepoResult<Option<(String, String)>> {
        self.query_first(
            "SELECT name, surname FROM clients WHERE id = ?1;",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
    }
}
