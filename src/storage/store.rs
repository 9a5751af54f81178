//! The Record Store: transactional primitives over the
//! `store` table. Every function here takes an already-open transaction;
//! callers are responsible for committing or rolling back.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Transaction};

use crate::error::Result;
use crate::storage::record::{Match, Record};

/// The latest record for `key`, or `None` if the key has no history.
pub fn get_latest(tx: &Transaction<'_>, key: &str) -> Result<Option<Record>> {
    let record = tx
        .query_row(
            "SELECT id, key, value, is_locked, is_hidden, timestamp, is_latest, expires_at
             FROM store WHERE key = ?1 AND is_latest = 1",
            params![key],
            Record::from_row,
        )
        .optional()?;
    Ok(record)
}

/// Latest records whose key begins with `prefix`, filtered by `m`.
pub fn list_latest(tx: &Transaction<'_>, prefix: &str, m: Match) -> Result<Vec<Record>> {
    let like_pattern = format!("{}%", escape_like(prefix));

    let sql = match m {
        Match::All => {
            "SELECT id, key, value, is_locked, is_hidden, timestamp, is_latest, expires_at
             FROM store WHERE is_latest = 1 AND key LIKE ?1 ESCAPE '\\' ORDER BY key"
        }
        Match::Existing => {
            "SELECT id, key, value, is_locked, is_hidden, timestamp, is_latest, expires_at
             FROM store WHERE is_latest = 1 AND key LIKE ?1 ESCAPE '\\' AND value != '' ORDER BY key"
        }
        Match::Deleted => {
            "SELECT id, key, value, is_locked, is_hidden, timestamp, is_latest, expires_at
             FROM store WHERE is_latest = 1 AND key LIKE ?1 ESCAPE '\\' AND value = '' ORDER BY key"
        }
    };

    let mut stmt = tx.prepare(sql)?;
    let records = stmt
        .query_map(params![like_pattern], Record::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

/// All records for `key`, ascending by `id`.
pub fn list_history(tx: &Transaction<'_>, key: &str) -> Result<Vec<Record>> {
    let mut stmt = tx.prepare(
        "SELECT id, key, value, is_locked, is_hidden, timestamp, is_latest, expires_at
         FROM store WHERE key = ?1 ORDER BY id ASC",
    )?;
    let records = stmt
        .query_map(params![key], Record::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

/// The record `steps` positions back from the latest (`steps = 0` is the
/// latest itself), ordered by `id` descending.
pub fn history_at(tx: &Transaction<'_>, key: &str, steps: i64) -> Result<Option<Record>> {
    let record = tx
        .query_row(
            "SELECT id, key, value, is_locked, is_hidden, timestamp, is_latest, expires_at
             FROM store WHERE key = ?1 ORDER BY id DESC LIMIT 1 OFFSET ?2",
            params![key, steps],
            Record::from_row,
        )
        .optional()?;
    Ok(record)
}

/// Demotes the current latest (if any) and inserts a new latest record.
/// A no-op if the proposed `(value, expires_at)` exactly matches the
/// current latest's.
pub fn append(
    tx: &Transaction<'_>,
    key: &str,
    value: &str,
    is_locked: bool,
    is_hidden: bool,
    expires_at: Option<DateTime<Utc>>,
) -> Result<()> {
    if let Some(current) = get_latest(tx, key)? {
        if current.value == value && current.expires_at == expires_at {
            return Ok(());
        }
    }

    demote_latest(tx, key)?;

    tx.execute(
        "INSERT INTO store (key, value, is_locked, is_hidden, expires_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![key, value, is_locked, is_hidden, expires_at],
    )?;

    Ok(())
}

/// Clears `is_latest` on the current latest record for `key`, if any.
pub fn demote_latest(tx: &Transaction<'_>, key: &str) -> Result<()> {
    tx.execute(
        "UPDATE store SET is_latest = 0 WHERE key = ?1 AND is_latest = 1",
        params![key],
    )?;
    Ok(())
}

/// Deletes the current latest record outright (used by lock/unlock so the
/// prior plaintext does not remain in history).
pub fn delete_latest(tx: &Transaction<'_>, key: &str) -> Result<()> {
    tx.execute(
        "DELETE FROM store WHERE key = ?1 AND is_latest = 1",
        params![key],
    )?;
    Ok(())
}

/// Flips `is_hidden` on the latest record in place; no new history row.
pub fn set_hidden(tx: &Transaction<'_>, key: &str, is_hidden: bool) -> Result<()> {
    tx.execute(
        "UPDATE store SET is_hidden = ?1 WHERE key = ?2 AND is_latest = 1",
        params![is_hidden, key],
    )?;
    Ok(())
}

/// Rewrites `key` to `new_key` on every record that currently carries
/// `old_key`. Precondition checks live above
/// this layer.
pub fn rename_all(tx: &Transaction<'_>, old_key: &str, new_key: &str) -> Result<()> {
    tx.execute(
        "UPDATE store SET key = ?1 WHERE key = ?2",
        params![new_key, old_key],
    )?;
    Ok(())
}

/// Deletes every record for `key` (hard delete).
pub fn prune(tx: &Transaction<'_>, key: &str) -> Result<()> {
    tx.execute("DELETE FROM store WHERE key = ?1", params![key])?;
    Ok(())
}

/// Deletes every non-latest record for `key`, plus the latest if it is a
/// tombstone.
pub fn clear_history_keep_latest(tx: &Transaction<'_>, key: &str) -> Result<()> {
    tx.execute(
        "DELETE FROM store WHERE key = ?1 AND (is_latest = 0 OR value = '')",
        params![key],
    )?;
    Ok(())
}

/// Same as [`clear_history_keep_latest`], restricted to keys matching `prefix`.
pub fn clear_history_by_prefix(tx: &Transaction<'_>, prefix: &str) -> Result<()> {
    let like_pattern = format!("{}%", escape_like(prefix));
    tx.execute(
        "DELETE FROM store WHERE key LIKE ?1 ESCAPE '\\' AND (is_latest = 0 OR value = '')",
        params![like_pattern],
    )?;
    Ok(())
}

/// Escapes `%`, `_`, and `\` so a user-supplied prefix is matched literally
/// in a `LIKE ... ESCAPE '\'` clause.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
