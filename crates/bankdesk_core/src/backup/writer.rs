//! Backup writer with rotate-then-replace semantics.
//!
//! # Responsibility
//! - Write the current export file for an entity kind.
//! - Copy an existing export to `<prefix>(MM-DD-YYYY-hh-mm-s).json` first.
//!
//! # Invariants
//! - The target is replaced only after the backup copy fully succeeded.
//! - A backup name only ever holds a complete copy; a failed copy leaves
//!   no file behind and does not touch an earlier backup of that name.
//! - Replacement goes through a temp file plus rename, so the target is
//!   either the old bytes or the new bytes, never a truncated mix.
//! - Two rotations of one kind within the same second share a backup name;
//!   the later copy overwrites the earlier one.

use crate::model::entity::EntityKind;
use chrono::{Local, NaiveDateTime};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// `chrono` pattern for backup names; seconds are not zero-padded.
pub const BACKUP_TIME_FORMAT: &str = "%m-%d-%Y-%H-%M-%-S";

pub type BackupResult<T> = Result<T, BackupError>;

/// Filesystem step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsStage {
    CreateDir,
    OpenSource,
    /// Staging the backup copy or moving it to its timestamped name.
    CreateBackup,
    Copy,
    Write,
}

impl Display for FsStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CreateDir => "create_dir",
            Self::OpenSource => "open_source",
            Self::CreateBackup => "create_backup",
            Self::Copy => "copy",
            Self::Write => "write",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct BackupError {
    pub stage: FsStage,
    pub path: PathBuf,
    pub source: io::Error,
}

impl BackupError {
    fn new(stage: FsStage, path: &Path, source: io::Error) -> Self {
        Self {
            stage,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "backup {} failed for `{}`: {}",
            self.stage,
            self.path.display(),
            self.source
        )
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Result of one successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// No previous export existed.
    Created { path: PathBuf },
    /// The previous export was copied to `backup_path` before replacement.
    Rotated { path: PathBuf, backup_path: PathBuf },
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Created { path } | Self::Rotated { path, .. } => path,
        }
    }

    pub fn backup_path(&self) -> Option<&Path> {
        match self {
            Self::Created { .. } => None,
            Self::Rotated { backup_path, .. } => Some(backup_path),
        }
    }
}

/// Writes export files into one backup directory.
#[derive(Debug, Clone)]
pub struct BackupWriter {
    dir: PathBuf,
}

impl BackupWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the current export for `kind`, e.g. `backup/managers.json`.
    pub fn target_path(&self, kind: EntityKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Path a rotation at `at` would copy the current export to.
    pub fn backup_path(&self, kind: EntityKind, at: NaiveDateTime) -> PathBuf {
        self.dir.join(format!(
            "{}({}).json",
            kind.backup_prefix(),
            at.format(BACKUP_TIME_FORMAT)
        ))
    }

    /// Writes `bytes` as the current export for `kind`, stamped with local time.
    pub fn write(&self, kind: EntityKind, bytes: &[u8]) -> BackupResult<WriteOutcome> {
        self.write_at(kind, bytes, Local::now().naive_local())
    }

    /// Writes `bytes` as the current export for `kind`, naming any rotated
    /// copy after `at`.
    ///
    /// # Errors
    /// - Any failing step returns a [`BackupError`] naming the stage. Steps
    ///   before the final replace never modify the current export.
    pub fn write_at(
        &self,
        kind: EntityKind,
        bytes: &[u8],
        at: NaiveDateTime,
    ) -> BackupResult<WriteOutcome> {
        let result = self.rotate_and_replace(kind, bytes, at);
        match &result {
            Ok(WriteOutcome::Created { path }) => info!(
                "event=backup_write module=backup status=ok kind={} mode=created path={} bytes={}",
                kind,
                path.display(),
                bytes.len()
            ),
            Ok(WriteOutcome::Rotated { path, backup_path }) => info!(
                "event=backup_write module=backup status=ok kind={} mode=rotated path={} backup_path={} bytes={}",
                kind,
                path.display(),
                backup_path.display(),
                bytes.len()
            ),
            Err(err) => error!(
                "event=backup_write module=backup status=error kind={} stage={} path={} error={}",
                kind,
                err.stage,
                err.path.display(),
                err.source
            ),
        }
        result
    }

    fn rotate_and_replace(
        &self,
        kind: EntityKind,
        bytes: &[u8],
        at: NaiveDateTime,
    ) -> BackupResult<WriteOutcome> {
        fs::create_dir_all(&self.dir)
            .map_err(|err| BackupError::new(FsStage::CreateDir, &self.dir, err))?;

        let target = self.target_path(kind);
        let mut current = match File::open(&target) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                self.replace(&target, bytes)?;
                return Ok(WriteOutcome::Created { path: target });
            }
            Err(err) => return Err(BackupError::new(FsStage::OpenSource, &target, err)),
        };

        let backup_path = self.backup_path(kind, at);
        let mut backup = NamedTempFile::new_in(&self.dir)
            .map_err(|err| BackupError::new(FsStage::CreateBackup, &backup_path, err))?;
        io::copy(&mut current, &mut backup)
            .and_then(|_| backup.as_file().sync_all())
            .map_err(|err| BackupError::new(FsStage::Copy, &backup_path, err))?;
        drop(current);
        backup
            .persist(&backup_path)
            .map_err(|err| BackupError::new(FsStage::CreateBackup, &backup_path, err.error))?;

        self.replace(&target, bytes)?;
        Ok(WriteOutcome::Rotated {
            path: target,
            backup_path,
        })
    }

    fn replace(&self, target: &Path, bytes: &[u8]) -> BackupResult<()> {
        let write_err = |err| BackupError::new(FsStage::Write, target, err);

        let mut staged = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        staged.write_all(bytes).map_err(write_err)?;
        staged.as_file().sync_all().map_err(write_err)?;
        staged
            .persist(target)
            .map_err(|err| BackupError::new(FsStage::Write, target, err.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::BackupWriter;
    use crate::model::entity::EntityKind;
    use chrono::NaiveDate;

    #[test]
    fn backup_name_uses_month_day_year_and_unpadded_seconds() {
        let writer = BackupWriter::new("backup");
        let at = NaiveDate::from_ymd_opt(2021, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 4)
            .unwrap();

        let path = writer.backup_path(EntityKind::Managers, at);
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "managersDataBackup(03-09-2021-07-05-4).json"
        );
    }

    #[test]
    fn target_path_lives_in_backup_dir() {
        let writer = BackupWriter::new("backup");
        assert_eq!(
            writer.target_path(EntityKind::Cards),
            std::path::Path::new("backup").join("clientsCards.json")
        );
    }
}
