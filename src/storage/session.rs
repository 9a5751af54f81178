//! Per-invocation transaction lifecycle, busy-retry policy, and panic-safe
//! rollback. Grounded in
//! `examples/original_source/src/common/helpers.go::retryOnBusy` and
//! `beginTarnsaction`.

use std::thread;
use std::time::{Duration, Instant};

use rusqlite::{Connection, TransactionBehavior};

use crate::config::Config;
use crate::error::{CellarError, Result};
use crate::storage::{cleanup, schema};

const RETRY_DELAY: Duration = Duration::from_millis(5);
const RETRY_BUDGET: Duration = Duration::from_secs(3);

/// One process invocation from database-open to commit or rollback. Owns
/// the `rusqlite::Connection`; callers open a transaction per operation via
/// [`Session::begin`].
pub struct Session {
    conn: Connection,
    config: Config,
}

impl Session {
    /// Opens (or creates) the database at `path`, applying pragmas and
    /// running any pending migrations, and loads `config` for use by the
    /// Cleanup Engine.
    pub fn open(path: &std::path::Path, config: Config) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut conn = retry_on_busy(|| Connection::open(path).map_err(CellarError::from))?;
        retry_on_busy(|| schema::apply_schema(&mut conn).map_err(CellarError::from))?;

        Ok(Session { conn, config })
    }

    #[cfg(test)]
    pub fn open_in_memory(config: Config) -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        schema::apply_schema(&mut conn)?;
        Ok(Session { conn, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Runs `op` inside a single immediate-write transaction, with the
    /// Cleanup Engine run first. Commits on `Ok`, rolls back on `Err`
    /// or panic (the transaction's `Drop` rolls back if not committed).
    pub fn run<T>(
        &mut self,
        op: impl FnOnce(&rusqlite::Transaction<'_>) -> Result<T>,
    ) -> Result<T> {
        let config = self.config.clone();
        let start = Instant::now();

        let tx = loop {
            match self
                .conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
            {
                Ok(tx) => break tx,
                Err(err) if is_busy_sqlite(&err) && start.elapsed() < RETRY_BUDGET => {
                    thread::sleep(RETRY_DELAY);
                }
                Err(err) if is_busy_sqlite(&err) => return Err(CellarError::Busy),
                Err(err) => return Err(err.into()),
            }
        };

        cleanup::run(&tx, &config)?;
        let result = op(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    /// Like [`Session::run`] but read-only in intent: still runs Cleanup
    /// first so readers observe the same post-cleanup state as writers.
    pub fn run_read<T>(
        &mut self,
        op: impl FnOnce(&rusqlite::Transaction<'_>) -> Result<T>,
    ) -> Result<T> {
        self.run(op)
    }
}

/// Retries `op` every [`RETRY_DELAY`] while it reports the database as busy,
/// up to [`RETRY_BUDGET`] of accumulated wait, then makes one final attempt
/// whose error (if any) is terminal.
fn retry_on_busy<T>(mut op: impl FnMut() -> Result<T>) -> Result<T> {
    let start = Instant::now();

    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if is_busy(&err) => {
                if start.elapsed() >= RETRY_BUDGET {
                    return match op() {
                        Ok(value) => Ok(value),
                        Err(err) if is_busy(&err) => Err(CellarError::Busy),
                        Err(err) => Err(err),
                    };
                }
                thread::sleep(RETRY_DELAY);
            }
            Err(err) => return Err(err),
        }
    }
}

fn is_busy(err: &CellarError) -> bool {
    matches!(err, CellarError::Sqlite(e) if is_busy_sqlite(e))
}

fn is_busy_sqlite(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::DatabaseBusy || e.code == rusqlite::ErrorCode::DatabaseLocked
    )
}
