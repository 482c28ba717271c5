//! Guest and plus-guest records.
//!
//! # Invariants
//! - `(first_name, last_name)` is a lookup key, not a unique key.
//! - `rsvp_status == None` means the guest has not responded yet.
//! - Plus-guest count limits are enforced by callers, not by storage.

use super::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// RSVP answer recorded for a guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    Attending,
    NotAttending,
}

impl RsvpStatus {
    /// Stable text form used in storage and exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attending => "attending",
            Self::NotAttending => "not_attending",
        }
    }

    /// Parses the stable text form. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "attending" => Some(Self::Attending),
            "not_attending" => Some(Self::NotAttending),
            _ => None,
        }
    }
}

/// One invited party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    /// Free-text category such as "Family" or "Friend".
    pub role: String,
    pub allowed_plus_guests: u32,
    pub rsvp_status: Option<RsvpStatus>,
    pub personal_message: Option<String>,
    pub submitted_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Guest {
    /// Returns whether this guest matches a search by name.
    ///
    /// Both sides are trimmed and compared case-insensitively.
    pub fn matches_name(&self, first_name: &str, last_name: &str) -> bool {
        normalize_name(&self.first_name) == normalize_name(first_name)
            && normalize_name(&self.last_name) == normalize_name(last_name)
    }

    /// Returns whether the guest has neither accepted nor declined.
    pub fn is_pending(&self) -> bool {
        self.rsvp_status.is_none()
    }
}

/// Insert input for [`Guest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGuest {
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    #[serde(default)]
    pub allowed_plus_guests: u32,
}

impl NewGuest {
    /// Creates an input with no plus-guest allowance.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            role: role.into(),
            allowed_plus_guests: 0,
        }
    }

    pub fn with_plus_guests(mut self, allowed: u32) -> Self {
        self.allowed_plus_guests = allowed;
        self
    }
}

/// Companion attached to a guest's RSVP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlusGuest {
    pub id: RecordId,
    pub guest_id: RecordId,
    pub name: String,
    pub relationship: Option<String>,
    pub created_at: Timestamp,
}

/// Insert input for [`PlusGuest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlusGuest {
    pub guest_id: RecordId,
    pub name: String,
    #[serde(default)]
    pub relationship: Option<String>,
}

/// Guest read model with its plus-guests attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestWithPlusGuests {
    #[serde(flatten)]
    pub guest: Guest,
    pub plus_guests: Vec<PlusGuest>,
}

/// Normalizes one name part into its lookup key form.
///
/// Stored keys and query keys must go through this same function so that
/// every backend agrees on what "matches" means.
pub fn normalize_name(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, Guest, RsvpStatus};

    fn guest(first: &str, last: &str) -> Guest {
        Guest {
            id: 1,
            first_name: first.to_string(),
            last_name: last.to_string(),
            role: "Family".to_string(),
            allowed_plus_guests: 0,
            rsvp_status: None,
            personal_message: None,
            submitted_at: None,
            created_at: 0,
        }
    }

    #[test]
    fn normalize_name_trims_and_lowercases() {
        assert_eq!(normalize_name("  ÉRICA "), "érica");
        assert_eq!(normalize_name("\tSantos\n"), "santos");
    }

    #[test]
    fn matches_name_ignores_case_and_padding_on_both_sides() {
        let stored = guest(" Erica", "Santos  ");
        assert!(stored.matches_name(" erica ", "SANTOS "));
        assert!(!stored.matches_name("Erica", "Santo"));
    }

    #[test]
    fn rsvp_status_text_form_is_stable() {
        for status in [RsvpStatus::Attending, RsvpStatus::NotAttending] {
            assert_eq!(RsvpStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RsvpStatus::parse("maybe"), None);
    }
}
