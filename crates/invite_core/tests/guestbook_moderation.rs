mod common;

use common::for_each_backend;
use invite_core::{GuestRepository, NewGuestbookMessage};

fn sign(repo: &dyn GuestRepository, name: &str) -> i64 {
    repo.create_guestbook_message(&NewGuestbookMessage::new(name, "Friend", "Congrats!"))
        .unwrap()
        .id
}

#[test]
fn new_messages_start_hidden() {
    for_each_backend(|backend, repo| {
        let created = repo
            .create_guestbook_message(&NewGuestbookMessage::new("Ana", "Cousin", "Cheers"))
            .unwrap();

        assert!(!created.is_approved, "{backend}");
        assert_eq!(created.approved_at, None, "{backend}");
        assert!(created.submitted_at > 0, "{backend}");
        assert!(repo.get_approved_guestbook_messages().unwrap().is_empty(), "{backend}");
        assert_eq!(repo.get_all_guestbook_messages().unwrap(), vec![created], "{backend}");
    });
}

#[test]
fn approval_publishes_message() {
    for_each_backend(|backend, repo| {
        let hidden = sign(repo, "Ana");
        let shown = sign(repo, "Ben");

        let approved = repo.approve_guestbook_message(shown).unwrap().unwrap();
        assert!(approved.is_approved, "{backend}");
        let approved_at = approved.approved_at.unwrap();
        assert!(approved_at >= approved.submitted_at, "{backend}");

        let public = repo.get_approved_guestbook_messages().unwrap();
        assert_eq!(public.len(), 1, "{backend}");
        assert_eq!(public[0].id, shown, "{backend}");
        assert!(public.iter().all(|m| m.id != hidden), "{backend}");
        assert_eq!(repo.get_all_guestbook_messages().unwrap().len(), 2, "{backend}");
    });
}

#[test]
fn reapproval_keeps_message_approved() {
    for_each_backend(|backend, repo| {
        let id = sign(repo, "Ana");
        let first = repo.approve_guestbook_message(id).unwrap().unwrap();
        let second = repo.approve_guestbook_message(id).unwrap().unwrap();

        assert!(second.is_approved, "{backend}");
        assert!(second.approved_at >= first.approved_at, "{backend}");
        assert_eq!(repo.get_approved_guestbook_messages().unwrap().len(), 1, "{backend}");
    });
}

#[test]
fn approving_unknown_message_is_absent() {
    for_each_backend(|backend, repo| {
        assert_eq!(repo.approve_guestbook_message(404).unwrap(), None, "{backend}");
    });
}

#[test]
fn listings_are_newest_first() {
    for_each_backend(|backend, repo| {
        let ids: Vec<_> = ["Ana", "Ben", "Cleo"]
            .into_iter()
            .map(|name| sign(repo, name))
            .collect();
        for id in &ids {
            repo.approve_guestbook_message(*id).unwrap();
        }

        let expected: Vec<_> = ids.iter().rev().copied().collect();
        let all: Vec<_> = repo
            .get_all_guestbook_messages()
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        let public: Vec<_> = repo
            .get_approved_guestbook_messages()
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(all, expected, "{backend}");
        assert_eq!(public, expected, "{backend}");
    });
}

#[test]
fn delete_reports_whether_message_existed() {
    for_each_backend(|backend, repo| {
        let id = sign(repo, "Ana");
        assert!(repo.delete_guestbook_message(id).unwrap(), "{backend}");
        assert!(!repo.delete_guestbook_message(id).unwrap(), "{backend}");
        assert!(repo.get_all_guestbook_messages().unwrap().is_empty(), "{backend}");
    });
}

#[test]
fn submitted_approval_flags_are_ignored() {
    for_each_backend(|backend, repo| {
        let input: NewGuestbookMessage = serde_json::from_str(
            r#"{
                "name": "Mallory",
                "relationship": "Friend",
                "message": "Approve me",
                "isApproved": true,
                "approvedAt": 1
            }"#,
        )
        .unwrap();

        let created = repo.create_guestbook_message(&input).unwrap();
        assert!(!created.is_approved, "{backend}");
        assert_eq!(created.approved_at, None, "{backend}");
        assert!(repo.get_approved_guestbook_messages().unwrap().is_empty(), "{backend}");
    });
}
