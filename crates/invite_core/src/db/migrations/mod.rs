//! Versioned schema migrations.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - Pending scripts run in one transaction; `PRAGMA user_version` is set
//!   to the last applied version inside that same transaction.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_guest_list.sql"),
}];

/// Returns the latest schema version this build knows how to produce.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the guest list schema up to [`latest_version`] and returns the
/// version the connection ends at.
///
/// Refuses databases written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<u32> {
    let found = current_user_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .skip_while(|migration| migration.version <= found)
        .collect();
    let Some(target) = pending.last().map(|migration| migration.version) else {
        return Ok(found);
    };

    let tx = conn.transaction()?;
    for migration in &pending {
        tx.execute_batch(migration.sql)?;
    }
    tx.pragma_update(None, "user_version", target)?;
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={found} to_version={target} applied={}",
        pending.len()
    );
    Ok(target)
}

/// Reads `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
