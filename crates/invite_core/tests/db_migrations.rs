use invite_core::db::migrations::{apply_migrations, latest_version};
use invite_core::db::{open_db, open_db_in_memory, DbError, GUEST_LIST_TABLES};
use invite_core::{
    GuestRepository, NewGuest, NewGuestbookMessage, RepoError, SqliteGuestRepository,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in GUEST_LIST_TABLES {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn reopening_a_file_keeps_data_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("invite.db");

    let conn_first = open_db(&path).unwrap();
    let guest = SqliteGuestRepository::try_new(&conn_first)
        .unwrap()
        .create_guest(&NewGuest::new("Erica", "Santos", "Family"))
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let repo = SqliteGuestRepository::try_new(&conn_second).unwrap();
    assert_eq!(repo.get_guest(guest.id).unwrap(), Some(guest));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn migrating_a_current_database_is_a_no_op() {
    let mut conn = open_db_in_memory().unwrap();
    assert_eq!(apply_migrations(&mut conn).unwrap(), latest_version());
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn connections_enforce_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteGuestRepository::try_new(&conn) {
        Err(RepoError::Db(DbError::SchemaNotCurrent { found: 0, expected })) => {
            assert_eq!(expected, latest_version())
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_missing_a_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteGuestRepository::try_new(&conn),
        Err(RepoError::Db(DbError::MissingTable("guests")))
    ));
}

#[test]
fn undecodable_rsvp_status_is_reported_not_masked() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGuestRepository::try_new(&conn).unwrap();
    let guest = repo
        .create_guest(&NewGuest::new("Jane", "Doe", "Friend"))
        .unwrap();

    // Bypass the CHECK constraint to simulate a row written by another tool.
    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "UPDATE guests SET rsvp_status = 'maybe' WHERE id = ?1;",
        [guest.id],
    )
    .unwrap();

    assert!(matches!(
        repo.get_guest(guest.id),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn guestbook_listings_follow_submission_time_not_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGuestRepository::try_new(&conn).unwrap();
    let ids: Vec<i64> = ["Ana", "Ben", "Cleo"]
        .into_iter()
        .map(|name| {
            let message = NewGuestbookMessage::new(name, "Friend", "Congrats!");
            repo.create_guestbook_message(&message).unwrap().id
        })
        .collect();
    for id in &ids {
        repo.approve_guestbook_message(*id).unwrap();
    }

    // Oldest row gets the latest timestamp; the two others tie.
    for (id, submitted_at) in [(ids[0], 3_000), (ids[1], 1_000), (ids[2], 1_000)] {
        conn.execute(
            "UPDATE guestbook_messages SET submitted_at = ?1 WHERE id = ?2;",
            [submitted_at, id],
        )
        .unwrap();
    }

    let expected = vec![ids[0], ids[2], ids[1]];
    let all: Vec<i64> = repo
        .get_all_guestbook_messages()
        .unwrap()
        .iter()
        .map(|message| message.id)
        .collect();
    let approved: Vec<i64> = repo
        .get_approved_guestbook_messages()
        .unwrap()
        .iter()
        .map(|message| message.id)
        .collect();
    assert_eq!(all, expected);
    assert_eq!(approved, expected);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
