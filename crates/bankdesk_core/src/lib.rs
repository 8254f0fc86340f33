//! Banking back office core: schema bootstrap, table access, sign-in and
//! rotated JSON exports of every table.

pub mod auth;
pub mod backup;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use backup::{build_snapshot, BackupError, BackupWriter, FsStage, Snapshot, WriteOutcome};
pub use config::{BankConfig, ConfigError};
pub use db::{apply_schema, open_db, open_db_in_memory, DbError, DbResult, Schema};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::account::{Client, Manager, NewAccount, Role};
pub use model::atm::{Atm, NewAtm};
pub use model::card::{Card, NewCard};
pub use model::entity::EntityKind;
pub use model::service::BankService;
pub use repo::bank_repo::{BankRepository, RepoError, RepoResult, SqliteBankRepository, TxStage};
pub use repo::record::Record;
pub use service::account_service::{AccountService, AccountServiceError, IssueCardRequest};
pub use service::export_service::{
    ExportError, ExportOutcome, ExportReport, ExportService, FailurePolicy, KindExport,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
