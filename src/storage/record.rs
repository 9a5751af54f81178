//! The `Record` type: one row of the `store` table.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::Serialize;

/// One version of a key's value. Every mutation appends a new `Record`; the
/// prior latest is demoted. `value == ""` on the latest record denotes a
/// tombstone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: i64,
    pub key: String,
    pub value: String,
    pub is_locked: bool,
    pub is_hidden: bool,
    pub timestamp: DateTime<Utc>,
    pub is_latest: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Record {
    pub fn is_tombstone(&self) -> bool {
        self.value.is_empty()
    }

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Record {
            id: row.get("id")?,
            key: row.get("key")?,
            value: row.get("value")?,
            is_locked: row.get("is_locked")?,
            is_hidden: row.get("is_hidden")?,
            timestamp: row.get("timestamp")?,
            is_latest: row.get("is_latest")?,
            expires_at: row.get("expires_at")?,
        })
    }
}

/// Which latest records a listing/matching query should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Match {
    #[default]
    All,
    Existing,
    Deleted,
}
