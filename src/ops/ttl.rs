//! `expire` (set/clear a key's TTL) and `ttl` (report time remaining).

use chrono::{DateTime, Duration, Utc};
use rusqlite::Transaction;

use crate::error::{CellarError, Result};
use crate::storage::store;

/// How long until `key`'s latest record expires.
pub struct TtlReport {
    pub expires_at: DateTime<Utc>,
    pub remaining: Duration,
}

/// Sets (`after = Some`) or clears (`after = None`, i.e. `--never`) the TTL
/// on `key`'s latest record, preserving `value`, `is_locked`, and
/// `is_hidden`. `after` may be negative, producing immediate expiry on the
/// next session's Cleanup pass.
pub fn expire(tx: &Transaction<'_>, key: &str, after: Option<Duration>) -> Result<()> {
    let record = store::get_latest(tx, key)?
        .filter(|r| !r.is_tombstone())
        .ok_or_else(|| CellarError::precondition(format!("key does not exist: {key}")))?;

    let expires_at: Option<DateTime<Utc>> = after.map(|d| Utc::now() + d);

    store::append(
        tx,
        key,
        &record.value,
        record.is_locked,
        record.is_hidden,
        expires_at,
    )
}

/// Reports the time remaining before `key`'s latest record expires.
/// Errors if the key does not exist, or if it exists but has no TTL set.
pub fn ttl(tx: &Transaction<'_>, key: &str) -> Result<TtlReport> {
    let record = store::get_latest(tx, key)?
        .filter(|r| !r.is_tombstone())
        .ok_or_else(|| CellarError::precondition(format!("key does not exist: {key}")))?;

    let expires_at = record
        .expires_at
        .ok_or_else(|| CellarError::precondition(format!("key does not expire: {key}")))?;

    Ok(TtlReport {
        expires_at,
        remaining: expires_at - Utc::now(),
    })
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
    fn expire_sets_expires_at() {
        let mut conn = open();
        let tx = conn.transaction().unwrap();
        crud::set(&tx, "k", "v", None, None).unwrap();

        expire(&tx, "k", Some(Duration::hours(1))).unwrap();

        let record = store::get_latest(&tx, "k").unwrap().unwrap();
        assert!(record.expires_at.is_some());
        assert_eq!(record.value, "v");
    }

    #[test]
    fn expire_never_clears_expires_at() {
        let mut conn = open();
        let tx = conn.transaction().unwrap();
        crud::set(&tx, "k", "v", None, None).unwrap();
        expire(&tx, "k", Some(Duration::hours(1))).unwrap();

        expire(&tx, "k", None).unwrap();

        let record = store::get_latest(&tx, "k").unwrap().unwrap();
        assert!(record.expires_at.is_none());
    }

    #[test]
    fn expire_missing_key_fails() {
        let mut conn = open();
        let tx = conn.transaction().unwrap();
        assert!(expire(&tx, "nope", Some(Duration::seconds(1))).is_err());
    }

    #[test]
    fn ttl_reports_remaining_time() {
        let mut conn = open();
        let tx = conn.transaction().unwrap();
        crud::set(&tx, "k", "v", None, None).unwrap();
        expire(&tx, "k", Some(Duration::hours(1))).unwrap();

        let report = ttl(&tx, "k").unwrap();
        assert!(report.remaining > Duration::minutes(59));
        assert!(report.remaining <= Duration::hours(1));
    }

    #[test]
    fn ttl_without_expiry_fails() {
        let mut conn = open();
        let tx = conn.transaction().unwrap();
        crud::set(&tx, "k", "v", None, None).unwrap();

        let err = ttl(&tx, "k").unwrap_err();
        assert!(matches!(err, CellarError::Precondition(_)));
    }

    #[test]
    fn ttl_missing_key_fails() {
        let mut conn = open();
        let tx = conn.transaction().unwrap();
        assert!(ttl(&tx, "nope").is_err());
    }
}
