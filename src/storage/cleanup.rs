//! The Cleanup Engine: Expire → Bound history → Reap, run at
//! the start of every session before the user operation executes. Grounded
//! in `examples/original_source/src/services/helpers.go::CleanUpDB`.

use rusqlite::{params, Transaction};

use crate::config::Config;
use crate::error::Result;
use crate::storage::store;

/// Runs the full cleanup pipeline inside the caller's transaction.
pub fn run(tx: &Transaction<'_>, config: &Config) -> Result<()> {
    expire_due_keys(tx)?;
    bound_history(tx, config.history_length)?;
    reap_dead_keys(tx, config.prune_history_after_days)?;
    Ok(())
}

/// Any latest record whose `expires_at` is in the past becomes a tombstone
/// via the normal `append` protocol, losing TTL and lock state.
fn expire_due_keys(tx: &Transaction<'_>) -> Result<()> {
    let keys: Vec<String> = {
        let mut stmt = tx.prepare(
            "SELECT key FROM store
             WHERE is_latest = 1 AND expires_at IS NOT NULL AND expires_at < CURRENT_TIMESTAMP",
        )?;
        stmt.query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
    };

    for key in keys {
        let is_hidden = store::get_latest(tx, &key)?
            .map(|r| r.is_hidden)
            .unwrap_or(false);
        store::append(tx, &key, "", false, is_hidden, None)?;
    }

    Ok(())
}

/// Keep only the most recent `history_length` records per key by `id`.
fn bound_history(tx: &Transaction<'_>, history_length: i64) -> Result<()> {
    tx.execute(
        "DELETE FROM store WHERE id IN (
            SELECT id FROM (
                SELECT id, ROW_NUMBER() OVER (PARTITION BY key ORDER BY id DESC) AS rn
                FROM store
            )
            WHERE rn > ?1
        )",
        params![history_length],
    )?;
    Ok(())
}

/// Any key whose latest record is a tombstone older than
/// `prune_history_after_days` has its full history removed.
fn reap_dead_keys(tx: &Transaction<'_>, prune_history_after_days: i64) -> Result<()> {
    let keys: Vec<String> = {
        let mut stmt = tx.prepare(
            "SELECT key FROM store
             WHERE is_latest = 1 AND value = '' AND timestamp < datetime('now', ?1)",
        )?;
        let cutoff = format!("-{prune_history_after_days} days");
        stmt.query_map(params![cutoff], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
    };

    for key in keys {
        store::prune(tx, &key)?;
    }

    Ok(())
}
