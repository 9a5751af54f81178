//! `list`.

use rusqlite::Transaction;

use crate::error::Result;
use crate::storage::record::{Match, Record};
use crate::storage::store;

/// Latest records whose key begins with `prefix`, filtered by `m`.
pub fn list(tx: &Transaction<'_>, prefix: &str, m: Match) -> Result<Vec<Record>> {
    store::list_latest(tx, prefix, m)
}
