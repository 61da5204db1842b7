//! Runtime configuration resolved from the process environment.
//!
//! # Responsibility
//! - Locate the SQLite database file.
//! - Choose log level and optional log directory.
//!
//! # Invariants
//! - Blank environment values behave as if unset.
//! - `log_level` is always one of `trace|debug|info|warn|error`.

use crate::logging::{default_log_level, normalize_level};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "PROFESSION_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "PROFESSION_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "PROFESSION_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "profession.sqlite3";

/// Settings shared by every entry point of the profession store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file; defaults to `profession.sqlite3` in the temp directory.
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Reads `PROFESSION_DB_PATH`, `PROFESSION_LOG_LEVEL` and
    /// `PROFESSION_LOG_DIR`.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    ///
    /// # Errors
    /// - Returns an error when the log level is not recognized.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        let db_path = value(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_level = match value(LOG_LEVEL_ENV) {
            Some(raw) => normalize_level(&raw).map_err(|err| format!("{LOG_LEVEL_ENV}: {err}"))?,
            None => default_log_level(),
        };
        let log_dir = value(LOG_DIR_ENV).map(PathBuf::from);

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}
