use bankdesk_core::{BackupWriter, EntityKind, FsStage, WriteOutcome};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};

fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 2, 28)
        .unwrap()
        .and_hms_opt(hour, minute, second)
        .unwrap()
}

fn backup_files(dir: &Path, kind: EntityKind) -> Vec<PathBuf> {
    let prefix = kind.backup_prefix();
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix))
        })
        .collect();
    files.sort();
    files
}

#[test]
fn fresh_target_is_written_without_backup() {
    let dir = tempfile::tempdir().unwrap();
    let writer = BackupWriter::new(dir.path().join("backup"));

    let outcome = writer
        .write_at(EntityKind::Managers, b"[]", at(10, 0, 0))
        .unwrap();

    assert!(matches!(outcome, WriteOutcome::Created { .. }));
    assert_eq!(fs::read(writer.target_path(EntityKind::Managers)).unwrap(), b"[]");
    assert!(backup_files(writer.dir(), EntityKind::Managers).is_empty());
}

#[test]
fn existing_target_is_rotated_before_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let writer = BackupWriter::new(dir.path());
    writer
        .write_at(EntityKind::Clients, b"content A", at(10, 0, 0))
        .unwrap();

    let outcome = writer
        .write_at(EntityKind::Clients, b"content B", at(10, 0, 5))
        .unwrap();

    let target = writer.target_path(EntityKind::Clients);
    assert_eq!(fs::read(&target).unwrap(), b"content B");

    let backups = backup_files(writer.dir(), EntityKind::Clients);
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read(&backups[0]).unwrap(), b"content A");
    assert_eq!(outcome.backup_path(), Some(backups[0].as_path()));
    assert_eq!(
        backups[0].file_name().unwrap().to_str().unwrap(),
        "clientsDataBackup(02-28-2021-10-00-5).json"
    );
}

#[test]
fn each_rotation_keeps_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let writer = BackupWriter::new(dir.path());

    writer.write_at(EntityKind::Atms, b"v1", at(9, 0, 0)).unwrap();
    writer.write_at(EntityKind::Atms, b"v2", at(9, 0, 1)).unwrap();
    writer.write_at(EntityKind::Atms, b"v3", at(9, 0, 2)).unwrap();

    let contents: Vec<Vec<u8>> = backup_files(writer.dir(), EntityKind::Atms)
        .iter()
        .map(|path| fs::read(path).unwrap())
        .collect();
    assert_eq!(contents, vec![b"v1".to_vec(), b"v2".to_vec()]);
    assert_eq!(
        fs::read(writer.target_path(EntityKind::Atms)).unwrap(),
        b"v3"
    );
}

#[test]
fn rotations_within_one_second_keep_only_latest_prior_content() {
    let dir = tempfile::tempdir().unwrap();
    let writer = BackupWriter::new(dir.path());

    writer.write_at(EntityKind::Cards, b"A", at(12, 30, 7)).unwrap();
    writer.write_at(EntityKind::Cards, b"B", at(12, 30, 7)).unwrap();
    writer.write_at(EntityKind::Cards, b"C", at(12, 30, 7)).unwrap();

    let backups = backup_files(writer.dir(), EntityKind::Cards);
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read(&backups[0]).unwrap(), b"B");
    assert_eq!(
        fs::read(writer.target_path(EntityKind::Cards)).unwrap(),
        b"C"
    );
}

#[test]
fn kinds_do_not_share_backups() {
    let dir = tempfile::tempdir().unwrap();
    let writer = BackupWriter::new(dir.path());

    writer.write_at(EntityKind::Services, b"s1", at(8, 0, 0)).unwrap();
    writer.write_at(EntityKind::Managers, b"m1", at(8, 0, 0)).unwrap();
    writer.write_at(EntityKind::Services, b"s2", at(8, 0, 1)).unwrap();

    assert_eq!(backup_files(writer.dir(), EntityKind::Services).len(), 1);
    assert!(backup_files(writer.dir(), EntityKind::Managers).is_empty());
}

#[test]
fn missing_backup_dir_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let writer = BackupWriter::new(&nested);

    writer.write(EntityKind::Managers, b"[]").unwrap();

    assert!(nested.join("managers.json").is_file());
}

#[test]
fn failed_backup_copy_leaves_target_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let writer = BackupWriter::new(dir.path());
    let when = at(11, 11, 11);
    writer.write_at(EntityKind::Managers, b"original", when).unwrap();

    // A directory squatting on the backup name makes the backup create fail.
    fs::create_dir(writer.backup_path(EntityKind::Managers, when)).unwrap();

    let err = writer
        .write_at(EntityKind::Managers, b"replacement", when)
        .unwrap_err();

    assert_eq!(err.stage, FsStage::CreateBackup);
    assert_eq!(
        fs::read(writer.target_path(EntityKind::Managers)).unwrap(),
        b"original"
    );
}

#[test]
fn unreadable_target_fails_at_open() {
    let dir = tempfile::tempdir().unwrap();
    let writer = BackupWriter::new(dir.path());
    fs::create_dir(writer.target_path(EntityKind::Atms)).unwrap();

    let err = writer
        .write_at(EntityKind::Atms, b"[]", at(1, 2, 3))
        .unwrap_err();

    assert!(matches!(err.stage, FsStage::OpenSource | FsStage::Copy));
    assert!(writer.target_path(EntityKind::Atms).is_dir());
    assert!(backup_files(writer.dir(), EntityKind::Atms).is_empty());
    assert_eq!(fs::read_dir(writer.dir()).unwrap().count(), 1);
}

#[test]
fn failed_copy_keeps_earlier_backup_of_same_second() {
    let dir = tempfile::tempdir().unwrap();
    let writer = BackupWriter::new(dir.path());
    let when = at(1, 2, 3);
    writer.write_at(EntityKind::Atms, b"first", when).unwrap();
    writer.write_at(EntityKind::Atms, b"second", when).unwrap();
    let backup = writer.backup_path(EntityKind::Atms, when);
    assert_eq!(fs::read(&backup).unwrap(), b"first");

    let target = writer.target_path(EntityKind::Atms);
    fs::remove_file(&target).unwrap();
    fs::create_dir(&target).unwrap();

    writer
        .write_at(EntityKind::Atms, b"third", when)
        .unwrap_err();

    assert_eq!(fs::read(&backup).unwrap(), b"first");
    assert_eq!(backup_files(writer.dir(), EntityKind::Atms), vec![backup]);
}

#[test]
fn backup_dir_path_occupied_by_file_fails_at_create_dir() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("backup");
    fs::write(&blocker, b"not a directory").unwrap();
    let writer = BackupWriter::new(&blocker);

    let err = writer
        .write_at(EntityKind::Clients, b"[]", at(0, 0, 0))
        .unwrap_err();

    assert_eq!(err.stage, FsStage::CreateDir);
}
