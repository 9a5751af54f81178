//! `hide` / `show`: a display-only flag flipped in place,
//! with no new history row.

use rusqlite::Transaction;

use crate::error::{CellarError, Result};
use crate::storage::store;

fn set_hidden(tx: &Transaction<'_>, key: &str, is_hidden: bool) -> Result<()> {
    let record = store::get_latest(tx, key)?
        .filter(|r| !r.is_tombstone())
        .ok_or_else(|| CellarError::precondition(format!("key does not exist: {key}")))?;

    if record.is_hidden == is_hidden {
        return Ok(());
    }

    store::set_hidden(tx, key, is_hidden)
}

pub fn hide(tx: &Transaction<'_>, key: &str) -> Result<()> {
    set_hidden(tx, key, true)
}

pub fn show(tx: &Transaction<'_>, key: &str) -> Result<()> {
    set_hidden(tx, key, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::crud;
    use crate::storage::schema::apply_schema;
    use rusqlite::Connection;

    fn open() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_schema(&mut conn).unwrap();
        conn
    }

    #[test]
    fn hide_then_show_round_trips_without_new_history() {
        let mut conn = open();
        let tx = conn.transaction().unwrap();
        crud::set(&tx, "k", "v", None, None).unwrap();

        hide(&tx, "k").unwrap();
        assert!(store::get_latest(&tx, "k").unwrap().unwrap().is_hidden);

        show(&tx, "k").unwrap();
        assert!(!store::get_latest(&tx, "k").unwrap().unwrap().is_hidden);

        assert_eq!(store::list_history(&tx, "k").unwrap().len(), 1);
    }

    #[test]
    fn repeated_hide_is_idempotent() {
        let mut conn = open();
        let tx = conn.transaction().unwrap();
        crud::set(&tx, "k", "v", None, None).unwrap();

        hide(&tx, "k").unwrap();
        hide(&tx, "k").unwrap();

        assert_eq!(store::list_history(&tx, "k").unwrap().len(), 1);
    }

    #[test]
    fn hide_missing_key_fails() {
        let mut conn = open();
        let tx = conn.transaction().unwrap();
        assert!(hide(&tx, "nope").is_err());
    }
}
