//! Admin dashboard use cases: login check, guest management, statistics
//! and guest-list export.
//!
//! # Invariants
//! - Login is a plaintext equality check; it only reports match/no match.
//! - Passwords never appear in logs.

use crate::export::write_guest_csv;
use crate::model::admin::{Admin, NewAdmin};
use crate::model::guest::{Guest, GuestWithPlusGuests, NewGuest};
use crate::model::stats::GuestStatistics;
use crate::model::RecordId;
use crate::repo::guest_repo::GuestRepository;
use crate::service::{require_text, NotFound, ServiceResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Admin login form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminLogin {
    pub username: String,
    pub password: String,
}

impl AdminLogin {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

pub struct AdminService<R: GuestRepository> {
    repo: R,
}

impl<R: GuestRepository> AdminService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns whether the credentials match a seeded admin.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable.
    pub fn verify_login(&self, login: &AdminLogin) -> ServiceResult<bool> {
        require_text("username", &login.username)?;
        require_text("password", &login.password)?;

        let accepted = self
            .repo
            .get_admin_by_username(&login.username)?
            .is_some_and(|admin| admin.password_matches(&login.password));
        if accepted {
            info!("event=admin_login module=service status=ok");
        } else {
            warn!("event=admin_login module=service status=rejected");
        }
        Ok(accepted)
    }

    /// Creates an admin credential. Used for seeding only.
    pub fn seed_admin(&self, admin: &NewAdmin) -> ServiceResult<Admin> {
        require_text("username", &admin.username)?;
        require_text("password", &admin.password)?;
        let created = self.repo.create_admin(admin)?;
        info!(
            "event=admin_seed module=service status=ok admin_id={}",
            created.id
        );
        Ok(created)
    }

    pub fn create_guest(&self, guest: &NewGuest) -> ServiceResult<Guest> {
        require_text("firstName", &guest.first_name)?;
        require_text("lastName", &guest.last_name)?;
        require_text("role", &guest.role)?;
        let created = self.repo.create_guest(guest)?;
        info!(
            "event=guest_create module=service status=ok guest_id={} allowed_plus_guests={}",
            created.id, created.allowed_plus_guests
        );
        Ok(created)
    }

    pub fn list_guests(&self) -> ServiceResult<Vec<GuestWithPlusGuests>> {
        Ok(self.repo.get_all_guests()?)
    }

    /// Deletes a guest together with its plus-guests.
    pub fn delete_guest(&self, id: RecordId) -> ServiceResult<()> {
        if !self.repo.delete_guest(id)? {
            return Err(NotFound::Guest(id).into());
        }
        info!("event=guest_delete module=service status=ok guest_id={id}");
        Ok(())
    }

    pub fn statistics(&self) -> ServiceResult<GuestStatistics> {
        Ok(self.repo.get_guest_statistics()?)
    }

    /// Writes the full guest list as CSV.
    pub fn export_guests_csv<W: Write>(&self, writer: W) -> ServiceResult<usize> {
        let guests = self.repo.get_all_guests()?;
        write_guest_csv(&guests, writer)?;
        info!(
            "event=guest_export module=service status=ok rows={}",
            guests.len()
        );
        Ok(guests.len())
    }
}
