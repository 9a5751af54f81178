//! Database schema and idempotent migrations.
//!
//! Migrations are an ordered list of DDL statements, applied strictly after
//! the stored `migration_index`; new releases append only. Grounded in
//! `examples/original_source/src/common/migration.go`, which tracks the
//! same ordinal in a one-row-per-key metadata table.

use rusqlite::{Connection, Result};

/// Ordered migrations defining the current shape of the `store` table.
/// Ordinals are stable; this list only ever grows.
const MIGRATIONS: &[&str] = &[
    // 0: create store table
    r"
    CREATE TABLE IF NOT EXISTS store (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        key TEXT NOT NULL,
        value TEXT NOT NULL,
        is_locked INTEGER NOT NULL DEFAULT 0,
        timestamp DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        is_latest INTEGER NOT NULL DEFAULT 1,
        expires_at DATETIME DEFAULT NULL
    );
    ",
    // 1: unique partial index enforcing a single latest row per key
    r"CREATE UNIQUE INDEX IF NOT EXISTS idx_store_unique_latest_key ON store(key) WHERE is_latest = 1;",
    // 2: prefix-matching / existing-vs-deleted listing support
    r"CREATE INDEX IF NOT EXISTS idx_store_latest_key_value ON store(key, is_latest, value);",
    // 3: TTL cleanup queries
    r"CREATE INDEX IF NOT EXISTS idx_store_latest_expire ON store(is_latest, expires_at);",
    // 4: history queries ordered by timestamp
    r"CREATE INDEX IF NOT EXISTS idx_store_key_timestamp ON store(key, timestamp);",
    // 5: history queries ordered by id (cheaper than by timestamp)
    r"CREATE INDEX IF NOT EXISTS idx_store_key_id ON store(key, id);",
    // 6: is_hidden column, added after the rest of the schema stabilized
    r"ALTER TABLE store ADD COLUMN is_hidden INTEGER NOT NULL DEFAULT 0;",
];

/// Apply any migrations newer than the stored ordinal, then set session-wide
/// pragmas. Safe to call on every `open()`.
pub fn apply_schema(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS cellar_metadata (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;

    run_migrations(conn)?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "busy_timeout", 5000)?;

    Ok(())
}

fn run_migrations(conn: &mut Connection) -> Result<()> {
    let latest_ordinal = (MIGRATIONS.len() - 1) as i64;

    let current_index: Option<i64> = conn
        .query_row(
            "SELECT value FROM cellar_metadata WHERE key = 'migration_index'",
            [],
            |row| row.get::<_, String>(0),
        )
        .ok()
        .and_then(|v| v.parse().ok());

    let start = match current_index {
        Some(idx) if idx >= latest_ordinal => return Ok(()),
        Some(idx) => (idx + 1) as usize,
        None => 0,
    };

    let tx = conn.transaction()?;

    for statement in &MIGRATIONS[start..] {
        tx.execute_batch(statement)?;
    }

    tx.execute(
        "INSERT INTO cellar_metadata (key, value) VALUES ('migration_index', ?1)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [latest_ordinal.to_string()],
    )?;

    tx.commit()?;

    Ok(())
}
