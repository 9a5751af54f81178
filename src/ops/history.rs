//! `history list|prune`.

use rusqlite::Transaction;

use crate::error::Result;
use crate::storage::record::Record;
use crate::storage::store;

/// All versions of `key`, ascending by `id`, the current latest last.
pub fn list(tx: &Transaction<'_>, key: &str) -> Result<Vec<Record>> {
    store::list_history(tx, key)
}

/// What a `history prune` invocation targets.
pub enum PruneTarget<'a> {
    Key(&'a str),
    Prefix(&'a str),
    All,
}

/// Drops non-latest (and tombstoned-latest) history per [`PruneTarget`].
pub fn prune(tx: &Transaction<'_>, target: PruneTarget<'_>) -> Result<()> {
    match target {
        PruneTarget::Key(key) => store::clear_history_keep_latest(tx, key),
        PruneTarget::Prefix(prefix) => store::clear_history_by_prefix(tx, prefix),
        PruneTarget::All => store::clear_history_by_prefix(tx, ""),
    }
}
