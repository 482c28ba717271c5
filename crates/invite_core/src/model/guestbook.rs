//! Guestbook message records.

use super::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// Public well-wish, hidden until an admin approves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestbookMessage {
    pub id: RecordId,
    pub name: String,
    pub relationship: String,
    pub message: String,
    pub is_approved: bool,
    pub submitted_at: Timestamp,
    pub approved_at: Option<Timestamp>,
}

/// Insert input for [`GuestbookMessage`].
///
/// Carries no approval fields: new messages always start unapproved, and
/// `isApproved`/`approvedAt` keys in submitted JSON are dropped here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGuestbookMessage {
    pub name: String,
    pub relationship: String,
    pub message: String,
}

impl NewGuestbookMessage {
    pub fn new(
        name: impl Into<String>,
        relationship: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            relationship: relationship.into(),
            message: message.into(),
        }
    }
}

/// Orders messages most recent first, newest id first on equal timestamps.
pub fn sort_newest_first(messages: &mut [GuestbookMessage]) {
    messages.sort_by(|a, b| {
        b.submitted_at
            .cmp(&a.submitted_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[cfg(test)]
mod tests {
    use super::{sort_newest_first, GuestbookMessage};

    fn message(id: i64, submitted_at: i64) -> GuestbookMessage {
        GuestbookMessage {
            id,
            name: format!("Guest {id}"),
            relationship: "Friend".to_string(),
            message: "Congrats!".to_string(),
            is_approved: false,
            submitted_at,
            approved_at: None,
        }
    }

    #[test]
    fn submission_time_outranks_id() {
        let mut messages = vec![message(1, 3_000), message(2, 1_000), message(3, 2_000)];
        sort_newest_first(&mut messages);
        let ids: Vec<i64> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, [1, 3, 2]);
    }

    #[test]
    fn equal_times_put_newest_id_first() {
        let mut messages = vec![message(4, 1_000), message(9, 1_000), message(2, 5_000)];
        sort_newest_first(&mut messages);
        let ids: Vec<i64> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, [2, 9, 4]);
    }
}
