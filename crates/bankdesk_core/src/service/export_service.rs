//! Export orchestration: snapshot → encode → rotate-and-write per entity kind.
//!
//! # Responsibility
//! - Drive every entity kind through the export pipeline in fixed order.
//! - Report one outcome per attempted kind; the caller decides what a
//!   partial failure means.
//!
//! # Invariants
//! - Kinds run in `EntityKind::ALL` order.
//! - With `FailurePolicy::Halt`, nothing after the first failing kind runs.

use crate::backup::{build_snapshot, BackupError, BackupWriter, WriteOutcome};
use crate::model::entity::EntityKind;
use crate::repo::bank_repo::{BankRepository, RepoError};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// What to do after an entity kind fails to export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failure.
    #[default]
    Halt,
    /// Attempt every kind regardless of earlier failures.
    Continue,
}

/// Failure of one kind's export, tagged with the pipeline step.
#[derive(Debug)]
pub enum ExportError {
    Snapshot(RepoError),
    Serialize(serde_json::Error),
    Write(BackupError),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Snapshot(err) => write!(f, "snapshot failed: {err}"),
            Self::Serialize(err) => write!(f, "serialization failed: {err}"),
            Self::Write(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Snapshot(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Write(err) => Some(err),
        }
    }
}

impl From<RepoError> for ExportError {
    fn from(value: RepoError) -> Self {
        Self::Snapshot(value)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<BackupError> for ExportError {
    fn from(value: BackupError) -> Self {
        Self::Write(value)
    }
}

/// Successful export of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindExport {
    pub rows: usize,
    pub write: WriteOutcome,
}

#[derive(Debug)]
pub struct ExportOutcome {
    pub kind: EntityKind,
    pub result: Result<KindExport, ExportError>,
}

/// Outcomes of one export run, in attempt order.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub outcomes: Vec<ExportOutcome>,
}

impl ExportReport {
    /// True when every kind was attempted and succeeded.
    pub fn is_success(&self) -> bool {
        self.outcomes.len() == EntityKind::ALL.len()
            && self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }

    pub fn first_failure(&self) -> Option<(EntityKind, &ExportError)> {
        self.outcomes.iter().find_map(|outcome| match &outcome.result {
            Ok(_) => None,
            Err(err) => Some((outcome.kind, err)),
        })
    }

    pub fn attempted(&self) -> Vec<EntityKind> {
        self.outcomes.iter().map(|outcome| outcome.kind).collect()
    }
}

/// Export orchestrator over a repository and a backup directory.
pub struct ExportService<R: BankRepository> {
    repo: R,
    writer: BackupWriter,
}

impl<R: BankRepository> ExportService<R> {
    pub fn new(repo: R, writer: BackupWriter) -> Self {
        Self { repo, writer }
    }

    /// Snapshots, encodes and writes a single kind.
    pub fn export_kind(&self, kind: EntityKind) -> Result<KindExport, ExportError> {
        let snapshot = build_snapshot(&self.repo, kind)?;
        let bytes = snapshot.to_json_bytes()?;
        let write = self.writer.write(kind, &bytes)?;
        Ok(KindExport {
            rows: snapshot.len(),
            write,
        })
    }

    /// Exports every kind in fixed order under `policy`.
    pub fn export_all(&self, policy: FailurePolicy) -> ExportReport {
        let started_at = Instant::now();
        let mut report = ExportReport::default();

        for kind in EntityKind::ALL {
            let result = self.export_kind(kind);
            let failed = match &result {
                Ok(export) => {
                    info!(
                        "event=export_kind module=export status=ok kind={} rows={} rotated={}",
                        kind,
                        export.rows,
                        export.write.backup_path().is_some()
                    );
                    false
                }
                Err(err) => {
                    error!(
                        "event=export_kind module=export status=error kind={} error={}",
                        kind, err
                    );
                    true
                }
            };
            report.outcomes.push(ExportOutcome { kind, result });

            if failed && policy == FailurePolicy::Halt {
                warn!(
                    "event=export_all module=export status=halted kind={} skipped={}",
                    kind,
                    EntityKind::ALL.len() - report.outcomes.len()
                );
                break;
            }
        }

        info!(
            "event=export_all module=export status={} attempted={} duration_ms={}",
            if report.is_success() { "ok" } else { "error" },
            report.outcomes.len(),
            started_at.elapsed().as_millis()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::{ExportError, ExportOutcome, ExportReport, FailurePolicy};
    use crate::model::entity::EntityKind;
    use crate::repo::bank_repo::RepoError;

    #[test]
    fn default_policy_halts() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::Halt);
    }

    #[test]
    fn report_finds_first_failure() {
        let report = ExportReport {
            outcomes: vec![ExportOutcome {
                kind: EntityKind::Managers,
                result: Err(ExportError::Snapshot(RepoError::NoCardsIssued)),
            }],
        };

        assert!(!report.is_success());
        let (kind, _) = report.first_failure().unwrap();
        assert_eq!(kind, EntityKind::Managers);
        assert_eq!(report.attempted(), vec![EntityKind::Managers]);
    }
}
