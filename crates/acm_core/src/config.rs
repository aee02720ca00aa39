//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve storage, logging and export locations for hosts (CLI/FFI).
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never fails; invalid log settings surface later from
//!   `init_logging`.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "ACM_DB_PATH";
pub const ENV_LOG_DIR: &str = "ACM_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "ACM_LOG_LEVEL";
pub const ENV_EXPORT_DIR: &str = "ACM_EXPORT_DIR";

const DEFAULT_DB_FILE_NAME: &str = "acm_builder.sqlite3";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite file holding the state blob.
    pub db_path: PathBuf,
    /// Rolling log directory; logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_dir: None,
            log_level: default_log_level().to_string(),
            export_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();
        Self {
            db_path: read(ENV_DB_PATH).map_or(defaults.db_path, PathBuf::from),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
            log_level: read(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            export_dir: read(ENV_EXPORT_DIR).map_or(defaults.export_dir, PathBuf::from),
        }
    }
}
