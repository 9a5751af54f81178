//! Backup / Restore / Export / Import protocol. Grounded in
//! `examples/original_source/src/cmd/backup.go`, `restore.go`, `export.go`,
//! and `import.go`: checkpoint-then-close-then-copy-then-reopen, with
//! `VACUUM INTO` for in-engine export and a held backup used to roll back a
//! failed swap.
//!
//! These operations close the live `rusqlite::Connection` to get exclusive
//! file access, so every function here consumes the caller's [`Session`] and
//! hands back a freshly reopened one.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::config::Config;
use crate::error::{CellarError, Result};
use crate::storage::session::Session;

/// Folds pending WAL frames into the main database file so a plain file copy
/// of `db_path` captures the full, current state.
fn checkpoint(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
    Ok(())
}

/// Opens `path` read-only and runs a harmless query, rejecting anything that
/// isn't a readable SQLite database.
fn validate_sqlite_file(path: &Path) -> Result<()> {
    let conn = Connection::open_with_flags(path, rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|_| CellarError::validation(format!("not a valid database file: {}", path.display())))?;
    conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
        .map_err(|_| CellarError::validation(format!("not a valid database file: {}", path.display())))?;
    Ok(())
}

fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    std::fs::copy(src, dst)?;
    Ok(())
}

fn sidecar_paths(db_path: &Path) -> Vec<PathBuf> {
    let mut wal = db_path.as_os_str().to_owned();
    wal.push("-wal");
    let mut shm = db_path.as_os_str().to_owned();
    shm.push("-shm");
    vec![PathBuf::from(wal), PathBuf::from(shm)]
}

fn remove_db_files(db_path: &Path) -> std::io::Result<()> {
    for path in std::iter::once(db_path.to_path_buf()).chain(sidecar_paths(db_path)) {
        match std::fs::remove_file(&path) {
            Ok(()) | Err(_) => {}
        }
    }
    Ok(())
}

/// Streams a checkpointed snapshot of the live database to `writer`
/// (`cellar db backup --stdout`). The session is closed for the
/// duration of the read and reopened before returning.
pub fn backup_to_writer(
    session: Session,
    db_path: &Path,
    writer: &mut dyn Write,
) -> Result<Session> {
    checkpoint(session.connection())?;
    let config = session.config().clone();
    drop(session);

    let mut file = std::fs::File::open(db_path)?;
    std::io::copy(&mut file, writer)?;

    Session::open(db_path, config)
}

/// Writes a checkpointed snapshot of the live database to `dest_path`
/// (`cellar db backup`'s default, path form of [`backup_to_writer`]).
pub fn backup_to_path(session: Session, db_path: &Path, dest_path: &Path) -> Result<Session> {
    checkpoint(session.connection())?;
    let config = session.config().clone();
    drop(session);

    copy_file(db_path, dest_path)?;
    Session::open(db_path, config)
}

/// In-engine copy of the live database to `dest_path` via `VACUUM INTO`
/// (`cellar db export`). Does not close the session: `VACUUM
/// INTO` runs against the live connection.
pub fn export_to_path(session: &Session, dest_path: &Path, force: bool) -> Result<()> {
    if dest_path.exists() {
        if !force {
            return Err(CellarError::precondition(format!(
                "file already exists: {} (use --force to overwrite)",
                dest_path.display()
            )));
        }
        std::fs::remove_file(dest_path)?;
    }

    session
        .connection()
        .execute("VACUUM INTO ?1", [dest_path.to_string_lossy()])?;
    Ok(())
}

/// Exports to a temporary file via `VACUUM INTO`, then streams that file to
/// `writer`.
pub fn export_to_writer(session: &Session, writer: &mut dyn Write) -> Result<()> {
    let tmp = tempfile::NamedTempFile::new()?;
    session
        .connection()
        .execute("VACUUM INTO ?1", [tmp.path().to_string_lossy()])?;

    let mut file = std::fs::File::open(tmp.path())?;
    std::io::copy(&mut file, writer)?;
    Ok(())
}

/// Stages `reader` into a fresh temp file so it can be validated and copied
/// as a path.
fn stage_reader(reader: &mut dyn Read) -> Result<tempfile::NamedTempFile> {
    let mut tmp = tempfile::NamedTempFile::new()?;
    std::io::copy(reader, tmp.as_file_mut())?;
    Ok(tmp)
}

/// Replaces the live database with the file at `source_path`, holding a
/// backup of the prior database for rollback. `held_backup_path` is where
/// that backup is written; callers choose a permanent location (import,
/// keeping it) or a transient temp file (restore, discarding it). On any
/// failure after the checkpoint, the held backup is copied back into place.
fn swap_database_file(
    session: Session,
    db_path: &Path,
    source_path: &Path,
    held_backup_path: &Path,
) -> Result<Session> {
    validate_sqlite_file(source_path)?;

    checkpoint(session.connection())?;
    let config = session.config().clone();
    drop(session);

    let attempt = (|| -> Result<()> {
        copy_file(db_path, held_backup_path)?;
        remove_db_files(db_path)?;
        copy_file(source_path, db_path)?;
        Ok(())
    })();

    if let Err(err) = attempt {
        remove_db_files(db_path)?;
        let _ = copy_file(held_backup_path, db_path);
        return Err(err);
    }

    match Session::open(db_path, config.clone()) {
        Ok(session) => Ok(session),
        Err(err) => {
            remove_db_files(db_path)?;
            copy_file(held_backup_path, db_path)?;
            let _ = Session::open(db_path, config);
            Err(err)
        }
    }
}

/// Imports `reader` as the new live database, keeping the prior database at
/// `backup_path` when `keep_backup` is set, or discarding it via a temp file
/// otherwise.
pub fn import_from_reader(
    session: Session,
    db_path: &Path,
    backup_path: &Path,
    keep_backup: bool,
    reader: &mut dyn Read,
) -> Result<Session> {
    let staged = stage_reader(reader)?;

    if keep_backup {
        swap_database_file(session, db_path, staged.path(), backup_path)
    } else {
        let discard = tempfile::NamedTempFile::new()?;
        swap_database_file(session, db_path, staged.path(), discard.path())
    }
}

/// Restores `reader` as the live database. The prior database is only held
/// transiently, for rollback, and the user-visible `.backup` file (if any)
/// is untouched.
pub fn restore_from_reader(session: Session, db_path: &Path, reader: &mut dyn Read) -> Result<Session> {
    let staged = stage_reader(reader)?;
    let transient = tempfile::NamedTempFile::new()?;
    swap_database_file(session, db_path, staged.path(), transient.path())
}

/// Restores from the default `<db-path>.backup` file in place
/// (`cellar db restore` with no explicit source, mirroring the original's
/// "restore the automatic backup" command).
pub fn restore_from_default_backup(
    session: Session,
    db_path: &Path,
    default_backup_path: &Path,
) -> Result<Session> {
    if !default_backup_path.exists() {
        return Err(CellarError::precondition("no backup file found"));
    }
    let mut file = std::fs::File::open(default_backup_path)?;
    restore_from_reader(session, db_path, &mut file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::store;

    fn write_key(session: &mut Session, key: &str, value: &str) {
        session
            .run(|tx| store::append(tx, key, value, false, false, None))
            .unwrap();
    }

    fn read_key(session: &mut Session, key: &str) -> String {
        session
            .run(|tx| Ok(store::get_latest(tx, key)?.unwrap().value))
            .unwrap()
    }

    #[test]
    fn backup_to_path_then_restore_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("kv.db");
        let backup_path = dir.path().join("kv.db.backup");

        let mut session = Session::open(&db_path, Config::default()).unwrap();
        write_key(&mut session, "k", "v1");

        let session = backup_to_path(session, &db_path, &backup_path).unwrap();
        let mut session = session;
        write_key(&mut session, "k", "v2");
        assert_eq!(read_key(&mut session, "k"), "v2");

        let mut session = restore_from_default_backup(session, &db_path, &backup_path).unwrap();
        assert_eq!(read_key(&mut session, "k"), "v1");
    }

    #[test]
    fn export_then_import_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("kv.db");
        let export_path = dir.path().join("export.db");
        let backup_path = dir.path().join("kv.db.backup");

        let mut session = Session::open(&db_path, Config::default()).unwrap();
        write_key(&mut session, "k", "exported");
        export_to_path(&session, &export_path, false).unwrap();

        write_key(&mut session, "k", "overwritten");

        let mut export_file = std::fs::File::open(&export_path).unwrap();
        let mut session =
            import_from_reader(session, &db_path, &backup_path, true, &mut export_file).unwrap();
        assert_eq!(read_key(&mut session, "k"), "exported");
        assert!(backup_path.exists(), "import with keep_backup must persist the prior db");
    }

    #[test]
    fn export_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("kv.db");
        let export_path = dir.path().join("export.db");
        std::fs::write(&export_path, b"not a db").unwrap();

        let session = Session::open(&db_path, Config::default()).unwrap();
        let err = export_to_path(&session, &export_path, false).unwrap_err();
        assert!(matches!(err, CellarError::Precondition(_)));
    }

    #[test]
    fn restore_rejects_non_database_source() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("kv.db");
        let session = Session::open(&db_path, Config::default()).unwrap();

        let mut bogus: &[u8] = b"not a database";
        let err = restore_from_reader(session, &db_path, &mut bogus).unwrap_err();
        assert!(matches!(err, CellarError::Validation(_)));
    }
}
