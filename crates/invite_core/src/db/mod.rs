//! SQLite storage bootstrap for the guest list.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Apply schema migrations before any guest data is touched.
//! - Tell callers holding a foreign connection whether it is usable.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Returned connections enforce foreign keys (plus-guest cascade).

use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// Tables every guest-list connection must carry.
pub const GUEST_LIST_TABLES: [&str; 4] = [
    "guests",
    "plus_guests",
    "guestbook_messages",
    "admins",
];

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build; refusing to touch it.
    SchemaTooNew { found: u32, supported: u32 },
    /// The connection was never migrated, or only partly.
    SchemaNotCurrent { found: u32, expected: u32 },
    MissingTable(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "guest list schema v{found} is newer than this build supports (v{supported})"
            ),
            Self::SchemaNotCurrent { found, expected } => write!(
                f,
                "guest list schema is v{found}, expected v{expected}; open it with open_db first"
            ),
            Self::MissingTable(table) => write!(f, "guest list table `{table}` is missing"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Checks that `conn` is at the current schema version and has every
/// guest-list table.
pub fn ensure_guest_list_schema(conn: &Connection) -> DbResult<()> {
    let found = migrations::current_user_version(conn)?;
    let expected = migrations::latest_version();
    if found != expected {
        return Err(DbError::SchemaNotCurrent { found, expected });
    }

    let mut stmt = conn.prepare(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
    )?;
    for table in GUEST_LIST_TABLES {
        let exists: bool = stmt.query_row([table], |row| row.get(0))?;
        if !exists {
            return Err(DbError::MissingTable(table));
        }
    }
    Ok(())
}
