//! Command-line surface: one `clap::Parser` tree covering every command
//! and alias. This layer is deliberately outside the storage engine's
//! scope; it is the runnable shell around it.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[value(rename_all = "lower")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "cellar", version, about = "A local, versioned key-value store")]
pub struct Cli {
    /// Render output as a table, JSON, or YAML.
    #[arg(long, short = 'o', global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Silence both stdout and stderr.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Raise the tracing filter to `debug`.
    #[arg(long, global = true)]
    pub debug: bool,

    /// `tracing-subscriber` formatter to use.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a value under a key, optionally with a TTL or a lock password.
    Set {
        key: String,
        value: String,
        #[arg(long, allow_hyphen_values = true)]
        expires_after: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },

    /// Read the latest value for a key.
    Get {
        key: String,
        #[arg(long)]
        password: Option<String>,
    },

    /// Tombstone one or more keys, or every key under a prefix.
    #[command(visible_alias = "del")]
    #[command(visible_alias = "rm")]
    Delete {
        keys: Vec<String>,
        #[arg(long)]
        prefix: Option<String>,
        #[arg(long)]
        prune: bool,
    },

    /// List the latest record per key.
    #[command(visible_alias = "ls")]
    List {
        #[arg(long, default_value = "")]
        prefix: String,
        #[arg(long)]
        deleted: bool,
        #[arg(long)]
        no_values: bool,
        #[arg(long)]
        reverse: bool,
    },

    /// Set or clear a key's time-to-live.
    Expire {
        key: String,
        #[arg(long, conflicts_with = "never", allow_hyphen_values = true)]
        after: Option<String>,
        #[arg(long)]
        never: bool,
    },

    /// Report how long before a key's latest value expires.
    Ttl {
        key: String,
        /// Print only the remaining seconds.
        #[arg(long, short = 's', conflicts_with = "date")]
        seconds: bool,
        /// Print only the expiry date.
        #[arg(long, short = 'd')]
        date: bool,
    },

    /// Encrypt a key's value under a password.
    #[command(visible_alias = "encrypt")]
    Lock {
        key: String,
        #[arg(long)]
        password: String,
    },

    /// Decrypt a key's value with a password.
    #[command(visible_alias = "decrypt")]
    Unlock {
        key: String,
        #[arg(long)]
        password: String,
    },

    /// Mark a key as hidden (display hint only).
    #[command(visible_alias = "obscure")]
    #[command(visible_alias = "redact")]
    #[command(visible_alias = "conceal")]
    Hide { key: String },

    /// Clear a key's hidden flag.
    #[command(visible_alias = "stet")]
    #[command(visible_alias = "reveal")]
    Show { key: String },

    /// Move a key (and its full history) to a new name.
    Rename { old: String, new: String },

    /// Copy a key's current value (and lock state) onto another key.
    Copy { src: String, dst: String },

    /// Inspect or rewrite a key's history.
    #[command(subcommand)]
    History(HistoryCommand),

    /// Report database path, backup path, counts, and effective config.
    Info,

    /// Remove the entire data directory.
    Implode {
        #[arg(long)]
        force: bool,
    },

    /// Whole-database backup, restore, export, and import.
    #[command(subcommand, name = "db")]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// Show every version of a key, oldest first.
    List {
        key: String,
        #[arg(long)]
        no_values: bool,
    },

    /// Read the value `steps` versions back without changing the latest.
    Select {
        key: String,
        #[arg(long)]
        steps: i64,
    },

    /// Make the version `steps` back the new latest.
    Revert {
        key: String,
        #[arg(long)]
        steps: i64,
    },

    /// Drop non-latest history for a key, a prefix, or everything.
    Prune {
        key: Option<String>,
        #[arg(long)]
        prefix: Option<String>,
        #[arg(long)]
        all: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum DbCommand {
    /// Checkpoint and copy the live database to the default backup path.
    Backup {
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long)]
        stdout: bool,
    },

    /// Restore the live database from a backup.
    Restore {
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long)]
        stdin: bool,
    },

    /// Export the live database to a file (or stdout with `-`/`--stdout`).
    Export {
        path: Option<PathBuf>,
        #[arg(long)]
        stdout: bool,
        #[arg(long)]
        force: bool,
    },

    /// Replace the live database with a file (or stdin with `-`/`--stdin`).
    Import {
        path: Option<PathBuf>,
        #[arg(long)]
        stdin: bool,
        /// Keep the pre-import database at the default backup path.
        #[arg(long)]
        backup: bool,
    },
}
