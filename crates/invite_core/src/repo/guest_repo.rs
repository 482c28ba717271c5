//! Guest-list repository contract shared by every storage backend.
//!
//! # Responsibility
//! - Define CRUD and query operations over guests, plus-guests, guestbook
//!   messages and admins, plus on-demand statistics.
//! - Define the backend failure type returned by every operation.
//!
//! # Invariants
//! - "Not found" is `Ok(None)` / `Ok(false)`, never an error.
//! - Input is assumed validated; repositories do not check shape.
//! - Guestbook listings are ordered by `submitted_at` DESC, then id DESC.
//! - Name lookups return the lowest-id match when names are duplicated.

use crate::db::DbError;
use crate::model::admin::{Admin, NewAdmin};
use crate::model::guest::{
    Guest, GuestWithPlusGuests, NewGuest, NewPlusGuest, PlusGuest, RsvpStatus,
};
use crate::model::guestbook::{GuestbookMessage, NewGuestbookMessage};
use crate::model::stats::GuestStatistics;
use crate::model::{RecordId, Timestamp};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Backend failure raised by a repository operation.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
    LockPoisoned,
    MissingGuest(RecordId),
    DuplicateUsername(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::LockPoisoned => write!(f, "in-memory store lock poisoned"),
            Self::MissingGuest(id) => write!(f, "owning guest {id} does not exist"),
            Self::DuplicateUsername(username) => {
                write!(f, "admin username `{username}` already exists")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for the guest list.
///
/// Both [`SqliteGuestRepository`](crate::SqliteGuestRepository) and
/// [`InMemoryGuestRepository`](crate::InMemoryGuestRepository) satisfy it
/// identically; callers depend only on this trait.
pub trait GuestRepository {
    fn get_guest(&self, id: RecordId) -> RepoResult<Option<Guest>>;
    /// Trimmed, case-insensitive match on both name parts.
    fn get_guest_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Option<GuestWithPlusGuests>>;
    fn create_guest(&self, guest: &NewGuest) -> RepoResult<Guest>;
    /// Records an RSVP answer.
    ///
    /// `personal_message = None` clears any previous message and
    /// `submitted_at = None` stamps the current time.
    fn update_guest_rsvp(
        &self,
        id: RecordId,
        status: RsvpStatus,
        personal_message: Option<&str>,
        submitted_at: Option<Timestamp>,
    ) -> RepoResult<Option<Guest>>;
    fn get_all_guests(&self) -> RepoResult<Vec<GuestWithPlusGuests>>;
    /// Removes the guest and every plus-guest that references it.
    fn delete_guest(&self, id: RecordId) -> RepoResult<bool>;
    fn create_plus_guest(&self, plus_guest: &NewPlusGuest) -> RepoResult<PlusGuest>;
    /// Idempotent.
    fn delete_plus_guests_by_guest_id(&self, guest_id: RecordId) -> RepoResult<()>;
    fn get_approved_guestbook_messages(&self) -> RepoResult<Vec<GuestbookMessage>>;
    fn get_all_guestbook_messages(&self) -> RepoResult<Vec<GuestbookMessage>>;
    fn create_guestbook_message(
        &self,
        message: &NewGuestbookMessage,
    ) -> RepoResult<GuestbookMessage>;
    /// Approving twice refreshes `approved_at`.
    fn approve_guestbook_message(&self, id: RecordId) -> RepoResult<Option<GuestbookMessage>>;
    fn delete_guestbook_message(&self, id: RecordId) -> RepoResult<bool>;
    fn get_admin_by_username(&self, username: &str) -> RepoResult<Option<Admin>>;
    fn create_admin(&self, admin: &NewAdmin) -> RepoResult<Admin>;
    fn get_guest_statistics(&self) -> RepoResult<GuestStatistics>;
}

impl<R: GuestRepository + ?Sized> GuestRepository for &R {
    fn get_guest(&self, id: RecordId) -> RepoResult<Option<Guest>> {
        (**self).get_guest(id)
    }

    fn get_guest_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Option<GuestWithPlusGuests>> {
        (**self).get_guest_by_name(first_name, last_name)
    }

    fn create_guest(&self, guest: &NewGuest) -> RepoResult<Guest> {
        (**self).create_guest(guest)
    }

    fn update_guest_rsvp(
        &self,
        id: RecordId,
        status: RsvpStatus,
        personal_message: Option<&str>,
        submitted_at: Option<Timestamp>,
    ) -> RepoResult<Option<Guest>> {
        (**self).update_guest_rsvp(id, status, personal_message, submitted_at)
    }

    fn get_all_guests(&self) -> RepoResult<Vec<GuestWithPlusGuests>> {
        (**self).get_all_guests()
    }

    fn delete_guest(&self, id: RecordId) -> RepoResult<bool> {
        (**self).delete_guest(id)
    }

    fn create_plus_guest(&self, plus_guest: &NewPlusGuest) -> RepoResult<PlusGuest> {
        (**self).create_plus_guest(plus_guest)
    }

    fn delete_plus_guests_by_guest_id(&self, guest_id: RecordId) -> RepoResult<()> {
        (**self).delete_plus_guests_by_guest_id(guest_id)
    }

    fn get_approved_guestbook_messages(&self) -> RepoResult<Vec<GuestbookMessage>> {
        (**self).get_approved_guestbook_messages()
    }

    fn get_all_guestbook_messages(&self) -> RepoResult<Vec<GuestbookMessage>> {
        (**self).get_all_guestbook_messages()
    }

    fn create_guestbook_message(
        &self,
        message: &NewGuestbookMessage,
    ) -> RepoResult<GuestbookMessage> {
        (**self).create_guestbook_message(message)
    }

    fn approve_guestbook_message(&self, id: RecordId) -> RepoResult<Option<GuestbookMessage>> {
        (**self).approve_guestbook_message(id)
    }

    fn delete_guestbook_message(&self, id: RecordId) -> RepoResult<bool> {
        (**self).delete_guestbook_message(id)
    }

    fn get_admin_by_username(&self, username: &str) -> RepoResult<Option<Admin>> {
        (**self).get_admin_by_username(username)
    }

    fn create_admin(&self, admin: &NewAdmin) -> RepoResult<Admin> {
        (**self).create_admin(admin)
    }

    fn get_guest_statistics(&self) -> RepoResult<GuestStatistics> {
        (**self).get_guest_statistics()
    }
}
