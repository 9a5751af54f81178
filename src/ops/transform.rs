//! `rename`, `copy`, `revert`.

use rusqlite::Transaction;

use crate::error::{CellarError, Result};
use crate::ops::crud::set_raw;
use crate::storage::store;

/// Rewrites every historical row of `old` to carry `new` as its key.
/// `new` must not currently exist; if `new`'s only history is a tombstone,
/// that history is dropped and `new` is treated as though it never existed.
pub fn rename(tx: &Transaction<'_>, old: &str, new: &str) -> Result<()> {
    store::get_latest(tx, old)?
        .filter(|r| !r.is_tombstone())
        .ok_or_else(|| CellarError::precondition(format!("key does not exist: {old}")))?;

    match store::get_latest(tx, new)? {
        Some(r) if r.is_tombstone() => store::prune(tx, new)?,
        Some(_) => return Err(CellarError::precondition(format!("key already exists: {new}"))),
        None => {}
    }

    store::rename_all(tx, old, new)
}

/// Copies `src`'s current value (and lock state, but not its TTL) onto
/// `dst`, preserving `dst`'s current `is_hidden` flag per `set` semantics.
pub fn copy(tx: &Transaction<'_>, src: &str, dst: &str) -> Result<()> {
    let record = store::get_latest(tx, src)?
        .filter(|r| !r.is_tombstone())
        .ok_or_else(|| CellarError::precondition(format!("key does not exist: {src}")))?;

    set_raw(tx, dst, &record.value, record.is_locked, None)
}

/// Rewinds `key` to the version `steps` positions back from the latest
/// (`steps >= 1`), appending it as a new latest row so the history itself
/// is preserved.
pub fn revert(tx: &Transaction<'_>, key: &str, steps: i64) -> Result<()> {
    if steps < 1 {
        return Err(CellarError::precondition("steps must be at least 1"));
    }

    let target = store::history_at(tx, key, steps)?
        .ok_or_else(|| CellarError::precondition(format!("no history entry {steps} steps back for {key}")))?;

    set_raw(tx, key, &target.value, target.is_locked, None)
}
