//! `info`: a read-only diagnostic report covering config, paths, and key
//! and record counts.

use std::path::PathBuf;

use rusqlite::Transaction;
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoReport {
    pub db_path: PathBuf,
    pub backup_path: PathBuf,
    pub total_keys: i64,
    pub total_records: i64,
    pub config: Config,
}

pub fn info(
    tx: &Transaction<'_>,
    config: &Config,
    db_path: PathBuf,
    backup_path: PathBuf,
) -> Result<InfoReport> {
    let total_keys: i64 = tx.query_row(
        "SELECT COUNT(*) FROM store WHERE is_latest = 1",
        [],
        |row| row.get(0),
    )?;
    let total_records: i64 = tx.query_row("SELECT COUNT(*) FROM store", [], |row| row.get(0))?;

    Ok(InfoReport {
        db_path,
        backup_path,
        total_keys,
        total_records,
        config: config.clone(),
    })
}
