//! `lock` / `unlock`: the only operations that mutate history directly —
//! the prior latest row is deleted, not demoted, so plaintext does not
//! survive the transition to a locked value.

use rusqlite::Transaction;

use crate::crypto;
use crate::error::{CellarError, Result};
use crate::storage::store;

/// Encrypts `key`'s current value under `password` and replaces the latest
/// record in place. Fails if `key` does not exist or is already locked.
pub fn lock(tx: &Transaction<'_>, key: &str, password: &str) -> Result<()> {
    let record = store::get_latest(tx, key)?
        .filter(|r| !r.is_tombstone())
        .ok_or_else(|| CellarError::precondition(format!("key does not exist: {key}")))?;

    if record.is_locked {
        return Err(CellarError::precondition(format!(
            "key already locked: {key}"
        )));
    }

    let ciphertext = crypto::encrypt(&record.value, password)?;

    store::delete_latest(tx, key)?;
    store::append(
        tx,
        key,
        &ciphertext,
        true,
        record.is_hidden,
        record.expires_at,
    )
}

/// Decrypts `key`'s current value under `password` and replaces the latest
/// record in place. Fails if `key` does not exist, is not locked, or the
/// password is wrong (in which case the transaction rolls back and nothing
/// changes).
pub fn unlock(tx: &Transaction<'_>, key: &str, password: &str) -> Result<()> {
    let record = store::get_latest(tx, key)?
        .filter(|r| !r.is_tombstone())
        .ok_or_else(|| CellarError::precondition(format!("key does not exist: {key}")))?;

    if !record.is_locked {
        return Err(CellarError::precondition(format!(
            "key is not locked: {key}"
        )));
    }

    let plaintext = crypto::decrypt(&record.value, password)?;

    store::delete_latest(tx, key)?;
    store::append(
        tx,
        key,
        &plaintext,
        false,
        record.is_hidden,
        record.expires_at,
    )
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
    fn lock_then_unlock_round_trips_and_preserves_flags() {
        let mut conn = open();
        let tx = conn.transaction().unwrap();
        crud::set(&tx, "k", "secret", None, None).unwrap();
        crate::ops::visibility::hide(&tx, "k").unwrap();

        lock(&tx, "k", "pw").unwrap();
        let locked = store::get_latest(&tx, "k").unwrap().unwrap();
        assert!(locked.is_locked);
        assert!(locked.is_hidden);
        assert_ne!(locked.value, "secret");

        unlock(&tx, "k", "pw").unwrap();
        let unlocked = store::get_latest(&tx, "k").unwrap().unwrap();
        assert!(!unlocked.is_locked);
        assert!(unlocked.is_hidden);
        assert_eq!(unlocked.value, "secret");
    }

    #[test]
    fn lock_deletes_prior_plaintext_row_from_history() {
        let mut conn = open();
        let tx = conn.transaction().unwrap();
        crud::set(&tx, "k", "secret", None, None).unwrap();
        lock(&tx, "k", "pw").unwrap();

        let history = store::list_history(&tx, "k").unwrap();
        assert_eq!(history.len(), 1, "plaintext row must not remain in history");
    }

    #[test]
    fn lock_twice_fails() {
        let mut conn = open();
        let tx = conn.transaction().unwrap();
        crud::set(&tx, "k", "secret", None, None).unwrap();
        lock(&tx, "k", "pw").unwrap();
        assert!(lock(&tx, "k", "pw").unwrap_err().to_string().contains("already locked"));
    }

    #[test]
    fn unlock_with_wrong_password_fails_and_leaves_value_locked() {
        let mut conn = open();
        let tx = conn.transaction().unwrap();
        crud::set(&tx, "k", "secret", None, None).unwrap();
        lock(&tx, "k", "pw").unwrap();

        assert!(unlock(&tx, "k", "wrong").is_err());
        assert!(store::get_latest(&tx, "k").unwrap().unwrap().is_locked);
    }

    #[test]
    fn unlock_unlocked_key_fails() {
        let mut conn = open();
        let tx = conn.transaction().unwrap();
        crud::set(&tx, "k", "v", None, None).unwrap();
        assert!(unlock(&tx, "k", "pw").is_err());
    }
}
