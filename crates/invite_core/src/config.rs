//! Runtime configuration read from the environment.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `INVITE_STORAGE` | `sqlite` | `sqlite` or `memory` |
//! | `INVITE_DB_PATH` | `invite.sqlite3` | SQLite file for the `sqlite` backend |
//! | `INVITE_LOG_LEVEL` | `debug` (debug build) / `info` | `trace..error` |
//! | `INVITE_LOG_DIR` | unset | rolling log directory; unset disables file logs |

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const STORAGE_VAR: &str = "INVITE_STORAGE";
pub const DB_PATH_VAR: &str = "INVITE_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "INVITE_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "INVITE_LOG_DIR";

const DEFAULT_DB_PATH: &str = "invite.sqlite3";

/// Which guest repository backend to construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite { path: PathBuf },
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownStorage(String),
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownStorage(value) => write!(
                f,
                "unsupported {STORAGE_VAR} `{value}`; expected sqlite|memory"
            ),
            Self::InvalidLogLevel(message) => write!(f, "{LOG_LEVEL_VAR}: {message}"),
        }
    }
}

impl Error for ConfigError {}

impl AppConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let storage = match get(STORAGE_VAR).map(|value| value.to_ascii_lowercase()) {
            None => sqlite_at(get(DB_PATH_VAR)),
            Some(value) if value == "sqlite" => sqlite_at(get(DB_PATH_VAR)),
            Some(value) if value == "memory" => StorageBackend::Memory,
            Some(other) => return Err(ConfigError::UnknownStorage(other)),
        };

        let log_level = match get(LOG_LEVEL_VAR) {
            Some(value) => normalize_level(&value).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        Ok(Self {
            storage,
            log_level,
            log_dir: get(LOG_DIR_VAR).map(PathBuf::from),
        })
    }
}

fn sqlite_at(path: Option<String>) -> StorageBackend {
    StorageBackend::Sqlite {
        path: PathBuf::from(path.unwrap_or_else(|| DEFAULT_DB_PATH.to_string())),
    }
}
