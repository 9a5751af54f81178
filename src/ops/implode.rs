//! `implode`: removes the data directory entirely. The only
//! operation that closes the session rather than running inside it, since
//! the directory it deletes holds the open database file.

use std::path::Path;

use crate::error::Result;
use crate::storage::session::Session;

/// Closes `session` and removes `data_dir` and everything under it.
/// Missing-directory is not an error (mirrors the original's `os.RemoveAll`
/// semantics in `examples/original_source/src/common/db.go::ClearDB`).
pub fn implode(session: Session, data_dir: &Path) -> Result<()> {
    drop(session);

    match std::fs::remove_dir_all(data_dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}
