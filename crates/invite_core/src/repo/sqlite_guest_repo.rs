//! SQLite implementation of [`GuestRepository`].
//!
//! # Responsibility
//! - Keep every SQL statement for the guest list inside this module.
//! - Decode rows strictly: malformed persisted values are reported, not masked.
//!
//! # Invariants
//! - The borrowed connection must be fully migrated (checked by `try_new`).
//! - Name key columns are written from `normalize_name`, the same function
//!   the in-memory backend compares with.
//! - Guest deletion removes plus-guests and the guest in one transaction.

use crate::db::ensure_guest_list_schema;
use crate::model::admin::{Admin, NewAdmin};
use crate::model::guest::{
    normalize_name, Guest, GuestWithPlusGuests, NewGuest, NewPlusGuest, PlusGuest, RsvpStatus,
};
use crate::model::guestbook::{GuestbookMessage, NewGuestbookMessage};
use crate::model::stats::GuestStatistics;
use crate::model::{now_epoch_ms, RecordId, Timestamp};
use crate::repo::guest_repo::{GuestRepository, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;

const GUEST_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    role,
    allowed_plus_guests,
    rsvp_status,
    personal_message,
    submitted_at,
    created_at
FROM guests";

const PLUS_GUEST_SELECT_SQL: &str = "SELECT
    id,
    guest_id,
    name,
    relationship,
    created_at
FROM plus_guests";

const MESSAGE_SELECT_SQL: &str = "SELECT
    id,
    name,
    relationship,
    message,
    is_approved,
    submitted_at,
    approved_at
FROM guestbook_messages";

const MESSAGE_ORDER_SQL: &str = "ORDER BY submitted_at DESC, id DESC";

/// SQLite-backed guest repository borrowing one migrated connection.
#[derive(Debug, Clone, Copy)]
pub struct SqliteGuestRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGuestRepository<'conn> {
    /// Wraps a connection returned by [`open_db`](crate::db::open_db) or
    /// [`open_db_in_memory`](crate::db::open_db_in_memory).
    ///
    /// # Errors
    /// - `Db(SchemaNotCurrent)` when the connection was not migrated.
    /// - `Db(MissingTable)` when a guest-list table is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_guest_list_schema(conn)?;
        Ok(Self { conn })
    }

    fn plus_guests_of(&self, guest_id: RecordId) -> RepoResult<Vec<PlusGuest>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PLUS_GUEST_SELECT_SQL} WHERE guest_id = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([guest_id])?;
        let mut plus_guests = Vec::new();
        while let Some(row) = rows.next()? {
            plus_guests.push(parse_plus_guest_row(row)?);
        }
        Ok(plus_guests)
    }

    fn get_message(&self, id: RecordId) -> RepoResult<Option<GuestbookMessage>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MESSAGE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_message_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_messages(&self, approved_only: bool) -> RepoResult<Vec<GuestbookMessage>> {
        let filter = if approved_only {
            " WHERE is_approved = 1"
        } else {
            ""
        };
        let mut stmt = self
            .conn
            .prepare(&format!("{MESSAGE_SELECT_SQL}{filter} {MESSAGE_ORDER_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut messages = Vec::new();
        while let Some(row) = rows.next()? {
            messages.push(parse_message_row(row)?);
        }
        Ok(messages)
    }
}

impl GuestRepository for SqliteGuestRepository<'_> {
    fn get_guest(&self, id: RecordId) -> RepoResult<Option<Guest>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GUEST_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_guest_row(row)?)),
            None => Ok(None),
        }
    }

    fn get_guest_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Option<GuestWithPlusGuests>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GUEST_SELECT_SQL}
             WHERE first_name_key = ?1
               AND last_name_key = ?2
             ORDER BY id ASC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query(params![normalize_name(first_name), normalize_name(last_name)])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let guest = parse_guest_row(row)?;
        let plus_guests = self.plus_guests_of(guest.id)?;
        Ok(Some(GuestWithPlusGuests { guest, plus_guests }))
    }

    fn create_guest(&self, guest: &NewGuest) -> RepoResult<Guest> {
        let created_at = now_epoch_ms();
        self.conn.execute(
            "INSERT INTO guests (
                first_name,
                last_name,
                first_name_key,
                last_name_key,
                role,
                allowed_plus_guests,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                guest.first_name.as_str(),
                guest.last_name.as_str(),
                normalize_name(&guest.first_name),
                normalize_name(&guest.last_name),
                guest.role.as_str(),
                guest.allowed_plus_guests,
                created_at,
            ],
        )?;

        Ok(Guest {
            id: self.conn.last_insert_rowid(),
            first_name: guest.first_name.clone(),
            last_name: guest.last_name.clone(),
            role: guest.role.clone(),
            allowed_plus_guests: guest.allowed_plus_guests,
            rsvp_status: None,
            personal_message: None,
            submitted_at: None,
            created_at,
        })
    }

    fn update_guest_rsvp(
        &self,
        id: RecordId,
        status: RsvpStatus,
        personal_message: Option<&str>,
        submitted_at: Option<Timestamp>,
    ) -> RepoResult<Option<Guest>> {
        let changed = self.conn.execute(
            "UPDATE guests
             SET
                rsvp_status = ?1,
                personal_message = ?2,
                submitted_at = ?3
             WHERE id = ?4;",
            params![
                status.as_str(),
                personal_message,
                submitted_at.unwrap_or_else(now_epoch_ms),
                id,
            ],
        )?;

        if changed == 0 {
            return Ok(None);
        }
        self.get_guest(id)
    }

    fn get_all_guests(&self) -> RepoResult<Vec<GuestWithPlusGuests>> {
        let mut by_guest: BTreeMap<RecordId, Vec<PlusGuest>> = BTreeMap::new();
        let mut stmt = self
            .conn
            .prepare(&format!("{PLUS_GUEST_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let plus_guest = parse_plus_guest_row(row)?;
            by_guest.entry(plus_guest.guest_id).or_default().push(plus_guest);
        }

        let mut stmt = self
            .conn
            .prepare(&format!("{GUEST_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut guests = Vec::new();
        while let Some(row) = rows.next()? {
            let guest = parse_guest_row(row)?;
            let plus_guests = by_guest.remove(&guest.id).unwrap_or_default();
            guests.push(GuestWithPlusGuests { guest, plus_guests });
        }

        Ok(guests)
    }

    fn delete_guest(&self, id: RecordId) -> RepoResult<bool> {
        let tx = self.conn.unchecked_transaction()?;
        let removed_plus_guests = tx.execute("DELETE FROM plus_guests WHERE guest_id = ?1;", [id])?;
        let removed = tx.execute("DELETE FROM guests WHERE id = ?1;", [id])?;
        tx.commit()?;

        debug!(
            "event=guest_delete module=repo backend=sqlite found={} plus_guests_removed={}",
            removed > 0,
            removed_plus_guests
        );
        Ok(removed > 0)
    }

    fn create_plus_guest(&self, plus_guest: &NewPlusGuest) -> RepoResult<PlusGuest> {
        let created_at = now_epoch_ms();
        let tx = self.conn.unchecked_transaction()?;
        let owner_exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM guests WHERE id = ?1);",
            [plus_guest.guest_id],
            |row| row.get(0),
        )?;
        if owner_exists != 1 {
            return Err(RepoError::MissingGuest(plus_guest.guest_id));
        }

        tx.execute(
            "INSERT INTO plus_guests (guest_id, name, relationship, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                plus_guest.guest_id,
                plus_guest.name.as_str(),
                plus_guest.relationship.as_deref(),
                created_at,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(PlusGuest {
            id,
            guest_id: plus_guest.guest_id,
            name: plus_guest.name.clone(),
            relationship: plus_guest.relationship.clone(),
            created_at,
        })
    }

    fn delete_plus_guests_by_guest_id(&self, guest_id: RecordId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM plus_guests WHERE guest_id = ?1;", [guest_id])?;
        Ok(())
    }

    fn get_approved_guestbook_messages(&self) -> RepoResult<Vec<GuestbookMessage>> {
        self.list_messages(true)
    }

    fn get_all_guestbook_messages(&self) -> RepoResult<Vec<GuestbookMessage>> {
        self.list_messages(false)
    }

    fn create_guestbook_message(
        &self,
        message: &NewGuestbookMessage,
    ) -> RepoResult<GuestbookMessage> {
        let submitted_at = now_epoch_ms();
        self.conn.execute(
            "INSERT INTO guestbook_messages (
                name,
                relationship,
                message,
                is_approved,
                submitted_at,
                approved_at
            ) VALUES (?1, ?2, ?3, 0, ?4, NULL);",
            params![
                message.name.as_str(),
                message.relationship.as_str(),
                message.message.as_str(),
                submitted_at,
            ],
        )?;

        Ok(GuestbookMessage {
            id: self.conn.last_insert_rowid(),
            name: message.name.clone(),
            relationship: message.relationship.clone(),
            message: message.message.clone(),
            is_approved: false,
            submitted_at,
            approved_at: None,
        })
    }

    fn approve_guestbook_message(&self, id: RecordId) -> RepoResult<Option<GuestbookMessage>> {
        let changed = self.conn.execute(
            "UPDATE guestbook_messages
             SET
                is_approved = 1,
                approved_at = ?1
             WHERE id = ?2;",
            params![now_epoch_ms(), id],
        )?;

        if changed == 0 {
            return Ok(None);
        }
        self.get_message(id)
    }

    fn delete_guestbook_message(&self, id: RecordId) -> RepoResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM guestbook_messages WHERE id = ?1;", [id])?;
        Ok(removed > 0)
    }

    fn get_admin_by_username(&self, username: &str) -> RepoResult<Option<Admin>> {
        let admin = self
            .conn
            .query_row(
                "SELECT id, username, password, created_at
                 FROM admins
                 WHERE username = ?1;",
                [username],
                |row| {
                    Ok(Admin {
                        id: row.get("id")?,
                        username: row.get("username")?,
                        password: row.get("password")?,
                        created_at: row.get("created_at")?,
                    })
                },
            )
            .optional()?;
        Ok(admin)
    }

    fn create_admin(&self, admin: &NewAdmin) -> RepoResult<Admin> {
        if self.get_admin_by_username(&admin.username)?.is_some() {
            return Err(RepoError::DuplicateUsername(admin.username.clone()));
        }

        let created_at = now_epoch_ms();
        self.conn.execute(
            "INSERT INTO admins (username, password, created_at) VALUES (?1, ?2, ?3);",
            params![admin.username.as_str(), admin.password.as_str(), created_at],
        )?;

        Ok(Admin {
            id: self.conn.last_insert_rowid(),
            username: admin.username.clone(),
            password: admin.password.clone(),
            created_at,
        })
    }

    fn get_guest_statistics(&self) -> RepoResult<GuestStatistics> {
        let mut stmt = self.conn.prepare("SELECT rsvp_status FROM guests;")?;
        let mut rows = stmt.query([])?;
        let mut statuses = Vec::new();
        while let Some(row) = rows.next()? {
            statuses.push(parse_rsvp_status(row.get("rsvp_status")?)?);
        }

        let total_plus_guests: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM plus_guests;", [], |row| row.get(0))?;
        let total_plus_guests = u64::try_from(total_plus_guests).map_err(|_| {
            RepoError::InvalidData(format!("negative plus-guest count {total_plus_guests}"))
        })?;

        Ok(GuestStatistics::tally(statuses, total_plus_guests))
    }
}

fn parse_guest_row(row: &Row<'_>) -> RepoResult<Guest> {
    let allowed: i64 = row.get("allowed_plus_guests")?;
    let allowed_plus_guests = u32::try_from(allowed).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid allowed_plus_guests value `{allowed}` in guests.allowed_plus_guests"
        ))
    })?;

    Ok(Guest {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        role: row.get("role")?,
        allowed_plus_guests,
        rsvp_status: parse_rsvp_status(row.get("rsvp_status")?)?,
        personal_message: row.get("personal_message")?,
        submitted_at: row.get("submitted_at")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_plus_guest_row(row: &Row<'_>) -> RepoResult<PlusGuest> {
    Ok(PlusGuest {
        id: row.get("id")?,
        guest_id: row.get("guest_id")?,
        name: row.get("name")?,
        relationship: row.get("relationship")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_message_row(row: &Row<'_>) -> RepoResult<GuestbookMessage> {
    let is_approved = match row.get::<_, i64>("is_approved")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_approved value `{other}` in guestbook_messages.is_approved"
            )));
        }
    };

    Ok(GuestbookMessage {
        id: row.get("id")?,
        name: row.get("name")?,
        relationship: row.get("relationship")?,
        message: row.get("message")?,
        is_approved,
        submitted_at: row.get("submitted_at")?,
        approved_at: row.get("approved_at")?,
    })
}

fn parse_rsvp_status(value: Option<String>) -> RepoResult<Option<RsvpStatus>> {
    match value {
        None => Ok(None),
        Some(text) => RsvpStatus::parse(&text).map(Some).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid rsvp status `{text}` in guests.rsvp_status"))
        }),
    }
}
