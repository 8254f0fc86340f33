//! Table snapshots and rotated JSON backup files.
//!
//! # Responsibility
//! - Turn a full table read into deterministic JSON bytes.
//! - Persist those bytes, preserving any previous export under a
//!   timestamped name first.
//!
//! # Invariants
//! - The writer is the only code that touches the backup directory.
//! - A current export file is replaced only after its backup copy succeeded.

pub mod snapshot;
pub mod writer;

pub use snapshot::{build_snapshot, Snapshot};
pub use writer::{BackupError, BackupResult, BackupWriter, FsStage, WriteOutcome};
