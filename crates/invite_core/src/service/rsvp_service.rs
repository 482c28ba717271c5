//! Self-service guest lookup and RSVP submission.
//!
//! # Invariants
//! - A submission replaces the guest's whole plus-guest set; it never merges.
//! - Plus-guests are only stored for `attending` answers.
//! - The update, clear and insert steps are separate repository calls; a
//!   failure midway leaves whatever was already written.

use crate::model::guest::{GuestWithPlusGuests, NewPlusGuest, RsvpStatus};
use crate::model::RecordId;
use crate::repo::guest_repo::GuestRepository;
use crate::service::{non_blank, require_text, NotFound, ServiceResult, ValidationError};
use log::info;
use serde::{Deserialize, Serialize};

/// Name pair typed by a guest looking up their invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestSearch {
    pub first_name: String,
    pub last_name: String,
}

impl GuestSearch {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// One companion named on an RSVP form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlusGuestInput {
    pub name: String,
    #[serde(default)]
    pub relationship: Option<String>,
}

impl PlusGuestInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relationship: None,
        }
    }
}

/// RSVP form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpSubmission {
    pub guest_id: RecordId,
    pub rsvp_status: RsvpStatus,
    #[serde(default)]
    pub personal_message: Option<String>,
    #[serde(default)]
    pub plus_guests: Vec<PlusGuestInput>,
}

impl RsvpSubmission {
    pub fn new(guest_id: RecordId, rsvp_status: RsvpStatus) -> Self {
        Self {
            guest_id,
            rsvp_status,
            personal_message: None,
            plus_guests: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.personal_message = Some(message.into());
        self
    }

    pub fn with_plus_guest(mut self, plus_guest: PlusGuestInput) -> Self {
        self.plus_guests.push(plus_guest);
        self
    }
}

/// Guest-facing RSVP use cases.
pub struct RsvpService<R: GuestRepository> {
    repo: R,
}

impl<R: GuestRepository> RsvpService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Finds an invitation by name, ignoring case and surrounding spaces.
    ///
    /// # Errors
    /// - `Validation` when either name part is blank.
    /// - `NotFound(GuestName)` when nobody matches.
    pub fn search_guest(&self, search: &GuestSearch) -> ServiceResult<GuestWithPlusGuests> {
        require_text("firstName", &search.first_name)?;
        require_text("lastName", &search.last_name)?;

        let found = self
            .repo
            .get_guest_by_name(&search.first_name, &search.last_name)?;
        info!(
            "event=guest_search module=service status=ok found={}",
            found.is_some()
        );
        found.ok_or_else(|| NotFound::GuestName.into())
    }

    /// Records an RSVP and rewrites the guest's plus-guests.
    ///
    /// # Contract
    /// - Plus-guest names must be non-blank.
    /// - When attending, the number of plus-guests must not exceed the
    ///   guest's `allowed_plus_guests`.
    /// - When not attending, submitted plus-guests are discarded and any
    ///   previous ones are removed.
    /// - Returns the updated guest with its new plus-guest set.
    pub fn submit_rsvp(&self, submission: &RsvpSubmission) -> ServiceResult<GuestWithPlusGuests> {
        for plus_guest in &submission.plus_guests {
            require_text("plusGuests.name", &plus_guest.name)?;
        }

        let guest_id = submission.guest_id;
        let guest = self
            .repo
            .get_guest(guest_id)?
            .ok_or(NotFound::Guest(guest_id))?;

        let attending = submission.rsvp_status == RsvpStatus::Attending;
        if attending && submission.plus_guests.len() > guest.allowed_plus_guests as usize {
            return Err(ValidationError::TooManyPlusGuests {
                allowed: guest.allowed_plus_guests,
                requested: submission.plus_guests.len(),
            }
            .into());
        }

        let personal_message = non_blank(submission.personal_message.as_deref());
        let updated = self
            .repo
            .update_guest_rsvp(
                guest_id,
                submission.rsvp_status,
                personal_message.as_deref(),
                None,
            )?
            .ok_or(NotFound::Guest(guest_id))?;

        self.repo.delete_plus_guests_by_guest_id(guest_id)?;

        let mut plus_guests = Vec::new();
        if attending {
            for input in &submission.plus_guests {
                plus_guests.push(self.repo.create_plus_guest(&NewPlusGuest {
                    guest_id,
                    name: input.name.trim().to_string(),
                    relationship: non_blank(input.relationship.as_deref()),
                })?);
            }
        }

        info!(
            "event=rsvp_submit module=service status=ok guest_id={} rsvp_status={} plus_guests={}",
            guest_id,
            submission.rsvp_status.as_str(),
            plus_guests.len()
        );
        Ok(GuestWithPlusGuests {
            guest: updated,
            plus_guests,
        })
    }
}
