//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract used by snapshot and export code.
//! - Isolate SQLite query details from orchestration.
//!
//! # Invariants
//! - This layer is the only code that touches the store.
//! - Store failures are classified (query/scan/cursor/transaction) and
//!   returned to the caller, never swallowed.

pub mod bank_repo;
pub mod record;
