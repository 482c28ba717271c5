//! Guestbook submission and moderation.

use crate::model::guestbook::{GuestbookMessage, NewGuestbookMessage};
use crate::model::RecordId;
use crate::repo::guest_repo::GuestRepository;
use crate::service::{require_text, NotFound, ServiceResult};
use log::info;

pub struct GuestbookService<R: GuestRepository> {
    repo: R,
}

impl<R: GuestRepository> GuestbookService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a new message for review. It stays hidden until approved.
    pub fn submit_message(&self, message: &NewGuestbookMessage) -> ServiceResult<GuestbookMessage> {
        require_text("name", &message.name)?;
        require_text("relationship", &message.relationship)?;
        require_text("message", &message.message)?;

        let created = self.repo.create_guestbook_message(message)?;
        info!(
            "event=guestbook_submit module=service status=ok message_id={}",
            created.id
        );
        Ok(created)
    }

    /// Approved messages, most recent first.
    pub fn public_messages(&self) -> ServiceResult<Vec<GuestbookMessage>> {
        Ok(self.repo.get_approved_guestbook_messages()?)
    }

    /// Every message for the moderation view, most recent first.
    pub fn all_messages(&self) -> ServiceResult<Vec<GuestbookMessage>> {
        Ok(self.repo.get_all_guestbook_messages()?)
    }

    pub fn approve(&self, id: RecordId) -> ServiceResult<GuestbookMessage> {
        let approved = self
            .repo
            .approve_guestbook_message(id)?
            .ok_or(NotFound::GuestbookMessage(id))?;
        info!("event=guestbook_approve module=service status=ok message_id={id}");
        Ok(approved)
    }

    pub fn delete(&self, id: RecordId) -> ServiceResult<()> {
        if !self.repo.delete_guestbook_message(id)? {
            return Err(NotFound::GuestbookMessage(id).into());
        }
        info!("event=guestbook_delete module=service status=ok message_id={id}");
        Ok(())
    }
}
