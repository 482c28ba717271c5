//! Process-local implementation of [`GuestRepository`].
//!
//! # Invariants
//! - Clones share one store; build it once and hand it to every caller.
//! - Every operation holds the store lock for its whole read-modify-write,
//!   so a guest delete and its plus-guest cascade are seen together.
//! - Ids start at 1 and are never reused, matching SQLite `AUTOINCREMENT`.

use crate::model::admin::{Admin, NewAdmin};
use crate::model::guest::{
    Guest, GuestWithPlusGuests, NewGuest, NewPlusGuest, PlusGuest, RsvpStatus,
};
use crate::model::guestbook::{sort_newest_first, GuestbookMessage, NewGuestbookMessage};
use crate::model::stats::GuestStatistics;
use crate::model::{now_epoch_ms, RecordId, Timestamp};
use crate::repo::guest_repo::{GuestRepository, RepoError, RepoResult};
use log::debug;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// In-memory guest repository. State is lost when the last clone drops.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGuestRepository {
    store: Arc<Mutex<MemoryStore>>,
}

#[derive(Debug, Default)]
struct MemoryStore {
    guests: BTreeMap<RecordId, Guest>,
    plus_guests: BTreeMap<RecordId, PlusGuest>,
    messages: BTreeMap<RecordId, GuestbookMessage>,
    admins: BTreeMap<RecordId, Admin>,
    sequences: Sequences,
}

#[derive(Debug, Default)]
struct Sequences {
    guest: RecordId,
    plus_guest: RecordId,
    message: RecordId,
    admin: RecordId,
}

fn next_id(counter: &mut RecordId) -> RecordId {
    *counter += 1;
    *counter
}

impl MemoryStore {
    fn plus_guests_of(&self, guest_id: RecordId) -> Vec<PlusGuest> {
        self.plus_guests
            .values()
            .filter(|plus_guest| plus_guest.guest_id == guest_id)
            .cloned()
            .collect()
    }

    fn with_plus_guests(&self, guest: &Guest) -> GuestWithPlusGuests {
        GuestWithPlusGuests {
            guest: guest.clone(),
            plus_guests: self.plus_guests_of(guest.id),
        }
    }

    fn remove_plus_guests_of(&mut self, guest_id: RecordId) -> usize {
        let before = self.plus_guests.len();
        self.plus_guests
            .retain(|_, plus_guest| plus_guest.guest_id != guest_id);
        before - self.plus_guests.len()
    }

    fn messages_newest_first(&self, approved_only: bool) -> Vec<GuestbookMessage> {
        let mut messages: Vec<GuestbookMessage> = self
            .messages
            .values()
            .filter(|message| !approved_only || message.is_approved)
            .cloned()
            .collect();
        sort_newest_first(&mut messages);
        messages
    }
}

impl InMemoryGuestRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_store<T>(&self, op: impl FnOnce(&mut MemoryStore) -> T) -> RepoResult<T> {
        let mut store = self.store.lock().map_err(|_| RepoError::LockPoisoned)?;
        Ok(op(&mut store))
    }
}

impl GuestRepository for InMemoryGuestRepository {
    fn get_guest(&self, id: RecordId) -> RepoResult<Option<Guest>> {
        self.with_store(|store| store.guests.get(&id).cloned())
    }

    fn get_guest_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Option<GuestWithPlusGuests>> {
        self.with_store(|store| {
            store
                .guests
                .values()
                .find(|guest| guest.matches_name(first_name, last_name))
                .map(|guest| store.with_plus_guests(guest))
        })
    }

    fn create_guest(&self, guest: &NewGuest) -> RepoResult<Guest> {
        self.with_store(|store| {
            let created = Guest {
                id: next_id(&mut store.sequences.guest),
                first_name: guest.first_name.clone(),
                last_name: guest.last_name.clone(),
                role: guest.role.clone(),
                allowed_plus_guests: guest.allowed_plus_guests,
                rsvp_status: None,
                personal_message: None,
                submitted_at: None,
                created_at: now_epoch_ms(),
            };
            store.guests.insert(created.id, created.clone());
            created
        })
    }

    fn update_guest_rsvp(
        &self,
        id: RecordId,
        status: RsvpStatus,
        personal_message: Option<&str>,
        submitted_at: Option<Timestamp>,
    ) -> RepoResult<Option<Guest>> {
        self.with_store(|store| {
            let guest = store.guests.get_mut(&id)?;
            guest.rsvp_status = Some(status);
            guest.personal_message = personal_message.map(str::to_owned);
            guest.submitted_at = Some(submitted_at.unwrap_or_else(now_epoch_ms));
            Some(guest.clone())
        })
    }

    fn get_all_guests(&self) -> RepoResult<Vec<GuestWithPlusGuests>> {
        self.with_store(|store| {
            store
                .guests
                .values()
                .map(|guest| store.with_plus_guests(guest))
                .collect()
        })
    }

    fn delete_guest(&self, id: RecordId) -> RepoResult<bool> {
        self.with_store(|store| {
            if store.guests.remove(&id).is_none() {
                return false;
            }
            let removed = store.remove_plus_guests_of(id);
            debug!(
                "event=guest_delete module=repo backend=memory found=true plus_guests_removed={removed}"
            );
            true
        })
    }

    fn create_plus_guest(&self, plus_guest: &NewPlusGuest) -> RepoResult<PlusGuest> {
        self.with_store(|store| {
            if !store.guests.contains_key(&plus_guest.guest_id) {
                return Err(RepoError::MissingGuest(plus_guest.guest_id));
            }
            let created = PlusGuest {
                id: next_id(&mut store.sequences.plus_guest),
                guest_id: plus_guest.guest_id,
                name: plus_guest.name.clone(),
                relationship: plus_guest.relationship.clone(),
                created_at: now_epoch_ms(),
            };
            store.plus_guests.insert(created.id, created.clone());
            Ok(created)
        })?
    }

    fn delete_plus_guests_by_guest_id(&self, guest_id: RecordId) -> RepoResult<()> {
        self.with_store(|store| {
            store.remove_plus_guests_of(guest_id);
        })
    }

    fn get_approved_guestbook_messages(&self) -> RepoResult<Vec<GuestbookMessage>> {
        self.with_store(|store| store.messages_newest_first(true))
    }

    fn get_all_guestbook_messages(&self) -> RepoResult<Vec<GuestbookMessage>> {
        self.with_store(|store| store.messages_newest_first(false))
    }

    fn create_guestbook_message(
        &self,
        message: &NewGuestbookMessage,
    ) -> RepoResult<GuestbookMessage> {
        self.with_store(|store| {
            let created = GuestbookMessage {
                id: next_id(&mut store.sequences.message),
                name: message.name.clone(),
                relationship: message.relationship.clone(),
                message: message.message.clone(),
                is_approved: false,
                submitted_at: now_epoch_ms(),
                approved_at: None,
            };
            store.messages.insert(created.id, created.clone());
            created
        })
    }

    fn approve_guestbook_message(&self, id: RecordId) -> RepoResult<Option<GuestbookMessage>> {
        self.with_store(|store| {
            let message = store.messages.get_mut(&id)?;
            message.is_approved = true;
            message.approved_at = Some(now_epoch_ms());
            Some(message.clone())
        })
    }

    fn delete_guestbook_message(&self, id: RecordId) -> RepoResult<bool> {
        self.with_store(|store| store.messages.remove(&id).is_some())
    }

    fn get_admin_by_username(&self, username: &str) -> RepoResult<Option<Admin>> {
        self.with_store(|store| {
            store
                .admins
                .values()
                .find(|admin| admin.username == username)
                .cloned()
        })
    }

    fn create_admin(&self, admin: &NewAdmin) -> RepoResult<Admin> {
        self.with_store(|store| {
            if store
                .admins
                .values()
                .any(|existing| existing.username == admin.username)
            {
                return Err(RepoError::DuplicateUsername(admin.username.clone()));
            }
            let created = Admin {
                id: next_id(&mut store.sequences.admin),
                username: admin.username.clone(),
                password: admin.password.clone(),
                created_at: now_epoch_ms(),
            };
            store.admins.insert(created.id, created.clone());
            Ok(created)
        })?
    }

    fn get_guest_statistics(&self) -> RepoResult<GuestStatistics> {
        self.with_store(|store| {
            GuestStatistics::tally(
                store.guests.values().map(|guest| guest.rsvp_status),
                store.plus_guests.len() as u64,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryGuestRepository;
    use crate::model::guest::NewGuest;
    use crate::model::guestbook::NewGuestbookMessage;
    use crate::repo::guest_repo::GuestRepository;
    use std::thread;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn repository_is_shareable_across_threads() {
        assert_send_sync::<InMemoryGuestRepository>();

        let repo = InMemoryGuestRepository::new();
        let workers: Vec<_> = (0..4)
            .map(|n| {
                let repo = repo.clone();
                thread::spawn(move || {
                    repo.create_guest(&NewGuest::new(format!("G{n}"), "Doe", "Friend"))
                        .unwrap()
                        .id
                })
            })
            .collect();
        let mut ids: Vec<i64> = workers.into_iter().map(|w| w.join().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, [1, 2, 3, 4]);
    }

    #[test]
    fn guestbook_listing_follows_submission_time() {
        let repo = InMemoryGuestRepository::new();
        let older = repo
            .create_guestbook_message(&NewGuestbookMessage::new("Ana", "Friend", "Hi"))
            .unwrap();
        let newer = repo
            .create_guestbook_message(&NewGuestbookMessage::new("Ben", "Friend", "Hey"))
            .unwrap();
        {
            let mut store = repo.store.lock().unwrap();
            store.messages.get_mut(&older.id).unwrap().submitted_at = 9_000;
            store.messages.get_mut(&newer.id).unwrap().submitted_at = 1_000;
        }

        let ids: Vec<i64> = repo
            .get_all_guestbook_messages()
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, [older.id, newer.id]);
    }

    #[test]
    fn clones_share_one_store() {
        let repo = InMemoryGuestRepository::new();
        let handle = repo.clone();
        let guest = repo.create_guest(&NewGuest::new("Ana", "Cruz", "Friend")).unwrap();
        assert_eq!(handle.get_guest(guest.id).unwrap(), Some(guest));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let repo = InMemoryGuestRepository::new();
        let first = repo.create_guest(&NewGuest::new("A", "B", "Friend")).unwrap();
        assert!(repo.delete_guest(first.id).unwrap());
        let second = repo.create_guest(&NewGuest::new("C", "D", "Friend")).unwrap();
        assert!(second.id > first.id);
    }
}
