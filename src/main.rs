//! CLI entry point: parses arguments, initializes logging, opens a
//! [`storage::Session`], dispatches to the Operations Layer, and maps
//! [`CellarError`] to a process exit code.

use std::io;

use clap::Parser;

use cellar::cli::{Cli, Command, DbCommand, HistoryCommand, LogFormat};
use cellar::config::Config;
use cellar::error::{CellarError, Result};
use cellar::output::OutputContext;
use cellar::storage::record::Match;
use cellar::storage::Session;
use cellar::{duration, ops, paths, storage};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug, cli.log_format);

    let ctx = OutputContext::new(cli.output, cli.quiet);
    match run(&cli, &ctx) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            ctx.error(&err.to_string());
            std::process::exit(err.exit_code());
        }
    }
}

fn init_tracing(debug: bool, format: LogFormat) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));

    match format {
        LogFormat::Pretty => {
            fmt().with_env_filter(filter).init();
        }
        LogFormat::Json => {
            fmt().with_env_filter(filter).json().init();
        }
    }
}

fn run(cli: &Cli, ctx: &OutputContext) -> Result<()> {
    let config = Config::load(&paths::config_path());
    let db_path = paths::db_path();
    let backup_path = paths::default_backup_path();

    if let Command::Implode { force } = &cli.command {
        if !force {
            return Err(CellarError::precondition(
                "implode is destructive; pass --force to proceed",
            ));
        }
        let session = Session::open(&db_path, config)?;
        ops::implode(session, &paths::data_dir())?;
        ctx.success("data directory removed");
        return Ok(());
    }

    if let Command::Db(db_cmd) = &cli.command {
        return run_db_command(db_cmd, &db_path, &backup_path, config, ctx);
    }

    let mut session = Session::open(&db_path, config)?;
    run_store_command(&cli.command, &mut session, ctx)
}

fn run_store_command(command: &Command, session: &mut Session, ctx: &OutputContext) -> Result<()> {
    match command {
        Command::Set {
            key,
            value,
            expires_after,
            password,
        } => {
            let expires_at = expires_after
                .as_deref()
                .map(duration::parse_duration)
                .transpose()?
                .map(|d| chrono::Utc::now() + d);
            session.run(|tx| ops::set(tx, key, value, expires_at, password.as_deref()))?;
            ctx.success(&format!("set {key}"));
        }

        Command::Get { key, password } => {
            let value = session.run(|tx| ops::get(tx, key, password.as_deref()))?;
            ctx.print_value(&value);
        }

        Command::Delete {
            keys,
            prefix,
            prune,
        } => {
            match (keys.is_empty(), prefix) {
                (false, Some(_)) => {
                    return Err(CellarError::precondition(
                        "cannot combine explicit keys with --prefix",
                    ))
                }
                (true, None) => {
                    return Err(CellarError::precondition(
                        "delete requires one or more keys, or --prefix",
                    ))
                }
                (false, None) => session.run(|tx| ops::delete_many(tx, keys, *prune))?,
                (true, Some(prefix)) => session.run(|tx| ops::delete_prefix(tx, prefix, *prune))?,
            }
            ctx.success("deleted");
        }

        Command::List {
            prefix,
            deleted,
            no_values,
            reverse,
        } => {
            let m = if *deleted { Match::Deleted } else { Match::Existing };
            let mut records = session.run(|tx| ops::list(tx, prefix, m))?;
            if *reverse {
                records.reverse();
            }
            ctx.print_listing(&records, *no_values);
        }

        Command::Expire { key, after, never } => {
            let duration = if *never {
                None
            } else {
                let spec = after.as_deref().ok_or_else(|| {
                    CellarError::precondition("expire requires --after or --never")
                })?;
                Some(duration::parse_duration(spec)?)
            };
            session.run(|tx| ops::expire(tx, key, duration))?;
            ctx.success(&format!("updated expiry for {key}"));
        }

        Command::Ttl { key, seconds, date } => {
            let report = session.run(|tx| ops::ttl::ttl(tx, key))?;
            if *seconds {
                ctx.print_value(&report.remaining.num_seconds().to_string());
            } else if *date {
                ctx.print_value(&report.expires_at.format("%Y-%m-%d %H:%M:%S").to_string());
            } else {
                ctx.print_value(&format!(
                    "{} (expires at {})",
                    duration::format_duration(report.remaining),
                    report.expires_at.format("%Y-%m-%d %H:%M:%S")
                ));
            }
        }

        Command::Lock { key, password } => {
            session.run(|tx| ops::lock(tx, key, password))?;
            ctx.success(&format!("locked {key}"));
        }

        Command::Unlock { key, password } => {
            session.run(|tx| ops::unlock(tx, key, password))?;
            ctx.success(&format!("unlocked {key}"));
        }

        Command::Hide { key } => {
            session.run(|tx| ops::hide(tx, key))?;
            ctx.success(&format!("hid {key}"));
        }

        Command::Show { key } => {
            session.run(|tx| ops::show(tx, key))?;
            ctx.success(&format!("revealed {key}"));
        }

        Command::Rename { old, new } => {
            session.run(|tx| ops::rename(tx, old, new))?;
            ctx.success(&format!("renamed {old} to {new}"));
        }

        Command::Copy { src, dst } => {
            session.run(|tx| ops::copy(tx, src, dst))?;
            ctx.success(&format!("copied {src} to {dst}"));
        }

        Command::History(history_cmd) => run_history_command(history_cmd, session, ctx)?,

        Command::Info => {
            let config = session.config().clone();
            let db_path = paths::db_path();
            let backup_path = paths::default_backup_path();
            let report = session.run(|tx| ops::db_info(tx, &config, db_path, backup_path))?;
            ctx.print_info(&report);
        }

        Command::Implode { .. } | Command::Db(_) => unreachable!("handled in run()"),
    }

    Ok(())
}

fn run_history_command(
    command: &HistoryCommand,
    session: &mut Session,
    ctx: &OutputContext,
) -> Result<()> {
    match command {
        HistoryCommand::List { key, no_values } => {
            let records = session.run(|tx| ops::history::list(tx, key))?;
            ctx.print_history(&records, *no_values);
        }

        HistoryCommand::Select { key, steps } => {
            let value = session.run(|tx| {
                storage::store::history_at(tx, key, *steps)?
                    .map(|r| r.value)
                    .ok_or_else(|| {
                        CellarError::precondition(format!(
                            "no history entry {steps} steps back for {key}"
                        ))
                    })
            })?;
            ctx.print_value(&value);
        }

        HistoryCommand::Revert { key, steps } => {
            session.run(|tx| ops::transform::revert(tx, key, *steps))?;
            ctx.success(&format!("reverted {key}"));
        }

        HistoryCommand::Prune { key, prefix, all } => {
            let target = match (key, prefix, all) {
                (Some(key), None, false) => ops::PruneTarget::Key(key),
                (None, Some(prefix), false) => ops::PruneTarget::Prefix(prefix),
                (None, None, true) => ops::PruneTarget::All,
                _ => {
                    return Err(CellarError::precondition(
                        "history prune requires exactly one of: a key, --prefix, or --all",
                    ))
                }
            };
            session.run(|tx| ops::history::prune(tx, target))?;
            ctx.success("history pruned");
        }
    }

    Ok(())
}

fn run_db_command(
    command: &DbCommand,
    db_path: &std::path::Path,
    default_backup_path: &std::path::Path,
    config: Config,
    ctx: &OutputContext,
) -> Result<()> {
    match command {
        DbCommand::Backup { path, stdout } => {
            let session = Session::open(db_path, config)?;
            if *stdout {
                let mut out = io::stdout();
                storage::backup::backup_to_writer(session, db_path, &mut out)?;
            } else {
                let dest = path.as_deref().unwrap_or(default_backup_path);
                storage::backup::backup_to_path(session, db_path, dest)?;
            }
            ctx.success("database backed up");
        }

        DbCommand::Restore { path, stdin } => {
            let session = Session::open(db_path, config)?;
            if *stdin {
                let mut input = io::stdin();
                storage::backup::restore_from_reader(session, db_path, &mut input)?;
            } else if let Some(path) = path {
                let mut file = std::fs::File::open(path)?;
                storage::backup::restore_from_reader(session, db_path, &mut file)?;
            } else {
                storage::backup::restore_from_default_backup(
                    session,
                    db_path,
                    default_backup_path,
                )?;
            }
            ctx.success("database restored");
        }

        DbCommand::Export {
            path,
            stdout,
            force,
        } => {
            let session = Session::open(db_path, config)?;
            if *stdout || path.as_deref().map(|p| p == std::path::Path::new("-")).unwrap_or(false) {
                let mut out = io::stdout();
                storage::backup::export_to_writer(&session, &mut out)?;
            } else {
                let dest = path
                    .as_deref()
                    .ok_or_else(|| CellarError::precondition("export requires a destination path or --stdout"))?;
                storage::backup::export_to_path(&session, dest, *force)?;
                ctx.success(&format!("database exported to {}", dest.display()));
            }
        }

        DbCommand::Import {
            path,
            stdin,
            backup,
        } => {
            let session = Session::open(db_path, config)?;
            if *stdin || path.as_deref().map(|p| p == std::path::Path::new("-")).unwrap_or(false) {
                let mut input = io::stdin();
                storage::backup::import_from_reader(
                    session,
                    db_path,
                    default_backup_path,
                    *backup,
                    &mut input,
                )?;
            } else {
                let path = path
                    .as_deref()
                    .ok_or_else(|| CellarError::precondition("import requires a source path or --stdin"))?;
                let mut file = std::fs::File::open(path)?;
                storage::backup::import_from_reader(
                    session,
                    db_path,
                    default_backup_path,
                    *backup,
                    &mut file,
                )?;
            }
            ctx.success("database imported");
        }
    }

    Ok(())
}
