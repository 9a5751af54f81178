//! YAML config file: `prune-history-after-days`, `history-length`.
//!
//! Grounded in `examples/original_source/src/common/config.go`: defaults
//! apply when the file is absent, and an invalid file is ignored with a
//! warning rather than aborting the process.

use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_PRUNE_HISTORY_AFTER_DAYS: i64 = 30;
const DEFAULT_HISTORY_LENGTH: i64 = 15;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "prune-history-after-days")]
    pub prune_history_after_days: i64,

    #[serde(rename = "history-length")]
    pub history_length: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prune_history_after_days: DEFAULT_PRUNE_HISTORY_AFTER_DAYS,
            history_length: DEFAULT_HISTORY_LENGTH,
        }
    }
}

impl Config {
    /// Load the config file at `path`, falling back to defaults on any
    /// read or parse failure. A parse failure is logged, not fatal.
    pub fn load(path: &Path) -> Self {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Config::default();
        };

        match serde_yaml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, path = %path.display(), "invalid config YAML, ignoring");
                Config::default()
            }
        }
    }
}
