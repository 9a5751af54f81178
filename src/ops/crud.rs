//! `set`, `get`, `delete`.

use chrono::{DateTime, Utc};
use rusqlite::Transaction;

use crate::crypto;
use crate::error::{CellarError, Result};
use crate::storage::record::Match;
use crate::storage::store;

/// Appends `value` as the new latest record for `key`, preserving the
/// current `is_hidden` flag. Used directly by [`set`] and by the
/// transform operations (`copy`, `revert`) that carry an already-resolved
/// value and lock state rather than a password.
pub(crate) fn set_raw(
    tx: &Transaction<'_>,
    key: &str,
    value: &str,
    is_locked: bool,
    expires_at: Option<DateTime<Utc>>,
) -> Result<()> {
    let is_hidden = store::get_latest(tx, key)?
        .map(|r| r.is_hidden)
        .unwrap_or(false);
    store::append(tx, key, value, is_locked, is_hidden, expires_at)
}

/// `value` must be non-empty. If `lock_password` is given, the stored value
/// is the ciphertext and `is_locked = true`.
pub fn set(
    tx: &Transaction<'_>,
    key: &str,
    value: &str,
    expires_at: Option<DateTime<Utc>>,
    lock_password: Option<&str>,
) -> Result<()> {
    if value.is_empty() {
        return Err(CellarError::precondition("value must not be empty"));
    }

    match lock_password {
        Some(password) => {
            let ciphertext = crypto::encrypt(value, password)?;
            set_raw(tx, key, &ciphertext, true, expires_at)
        }
        None => set_raw(tx, key, value, false, expires_at),
    }
}

/// Reads the latest existing value for `key`. A tombstone or absent key is
/// reported as "does not exist". A locked value requires `password`; an
/// unlocked value ignores a supplied password and returns the raw text.
pub fn get(tx: &Transaction<'_>, key: &str, password: Option<&str>) -> Result<String> {
    let record = store::get_latest(tx, key)?
        .filter(|r| !r.is_tombstone())
        .ok_or_else(|| CellarError::precondition(format!("key does not exist: {key}")))?;

    if record.is_locked {
        let password = password
            .ok_or_else(|| CellarError::precondition("password required to read a locked key"))?;
        crypto::decrypt(&record.value, password)
    } else {
        Ok(record.value)
    }
}

/// Tombstones `key`; if `prune`, also drops all non-latest/tombstone
/// history for it. Fails (and rolls back) if `key` does not currently exist.
pub fn delete(tx: &Transaction<'_>, key: &str, prune: bool) -> Result<()> {
    let record = store::get_latest(tx, key)?
        .filter(|r| !r.is_tombstone())
        .ok_or_else(|| CellarError::precondition(format!("key does not exist: {key}")))?;

    store::append(tx, key, "", false, record.is_hidden, None)?;
    if prune {
        store::clear_history_keep_latest(tx, key)?;
    }
    Ok(())
}

/// Deletes every key, applying the same all-or-nothing semantics as a
/// single `delete`: the caller's transaction rolls back as a whole if any
/// key is missing.
pub fn delete_many(tx: &Transaction<'_>, keys: &[String], prune: bool) -> Result<()> {
    for key in keys {
        delete(tx, key, prune)?;
    }
    Ok(())
}

/// Deletes every existing key matching `prefix`.
pub fn delete_prefix(tx: &Transaction<'_>, prefix: &str, prune: bool) -> Result<()> {
    for record in store::list_latest(tx, prefix, Match::Existing)? {
        delete(tx, &record.key, prune)?;
    }
    Ok(())
}
