//! Per-user data/config directory discovery.
//!
//! Mirrors the original's use of `go-app-paths`: a per-user data directory
//! holding `kv.db` and its WAL sidecars, and a per-user config directory
//! holding `config.yaml`. Both can be redirected via `CELLAR_DATA_DIR` /
//! `CELLAR_CONFIG_DIR` so tests (and this crate's own e2e suite) can run
//! against an isolated filesystem location.

use directories::ProjectDirs;
use std::path::PathBuf;

const QUALIFIER: &str = "";
const ORGANIZATION: &str = "";
const APPLICATION: &str = "cellar";

fn project_dirs() -> ProjectDirs {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .expect("could not determine home directory for per-user paths")
}

pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CELLAR_DATA_DIR") {
        return PathBuf::from(dir);
    }
    project_dirs().data_dir().to_path_buf()
}

pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CELLAR_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    project_dirs().config_dir().to_path_buf()
}

pub fn db_path() -> PathBuf {
    data_dir().join("kv.db")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.yaml")
}

pub fn default_backup_path() -> PathBuf {
    let mut path = db_path().into_os_string();
    path.push(".backup");
    PathBuf::from(path)
}

/// Resolve `~` at the start of a path and make it absolute.
pub fn normalize_path(path: &str) -> std::io::Result<PathBuf> {
    let expanded = if let Some(rest) = path.strip_prefix('~') {
        let home = directories::BaseDirs::new()
            .map(|b| b.home_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        home.join(rest.trim_start_matches('/'))
    } else {
        PathBuf::from(path)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(std::env::current_dir()?.join(expanded))
    }
}
