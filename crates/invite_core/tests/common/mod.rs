use invite_core::db::open_db_in_memory;
use invite_core::{GuestRepository, InMemoryGuestRepository, SqliteGuestRepository};

/// Runs one contract check against every storage backend.
pub fn for_each_backend(check: impl Fn(&str, &dyn GuestRepository)) {
    let memory = InMemoryGuestRepository::new();
    check("memory", &memory);

    let conn = open_db_in_memory().unwrap();
    let sqlite = SqliteGuestRepository::try_new(&conn).unwrap();
    check("sqlite", &sqlite);
}
