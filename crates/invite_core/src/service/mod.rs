//! Use-case services in front of the guest repository.
//!
//! # Responsibility
//! - Validate request shape before any repository call.
//! - Turn absent results into explicit `NotFound` errors.
//! - Collapse every failure into one of three outward categories.
//!
//! # Invariants
//! - A `Validation` error means no repository call was made.
//! - Services never retry a failed repository call.

use crate::export::ExportError;
use crate::model::RecordId;
use crate::repo::guest_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod admin_service;
pub mod guestbook_service;
pub mod rsvp_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Outward error classes; an HTTP layer maps these to 400, 404 and 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    BadRequest,
    NotFound,
    Internal,
}

/// Request shape problems detected before touching storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingField(&'static str),
    TooManyPlusGuests { allowed: u32, requested: usize },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::TooManyPlusGuests { allowed, requested } => write!(
                f,
                "you can only bring up to {allowed} plus guests, got {requested}"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Record kinds a lookup can fail to find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    Guest(RecordId),
    GuestName,
    GuestbookMessage(RecordId),
}

impl Display for NotFound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Guest(_) | Self::GuestName => write!(f, "Guest not found"),
            Self::GuestbookMessage(_) => write!(f, "Message not found"),
        }
    }
}

#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    NotFound(NotFound),
    Repo(RepoError),
    Export(ExportError),
}

impl ServiceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::BadRequest,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Repo(_) | Self::Export(_) => ErrorCategory::Internal,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(what) => write!(f, "{what}"),
            Self::Repo(err) => write!(f, "storage failure: {err}"),
            Self::Export(err) => write!(f, "export failure: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Repo(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<NotFound> for ServiceError {
    fn from(value: NotFound) -> Self {
        Self::NotFound(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ExportError> for ServiceError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

/// Rejects empty or whitespace-only required text.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

/// Trims optional text, mapping blank values to `None`.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::{non_blank, require_text, ErrorCategory, NotFound, ServiceError, ValidationError};
    use crate::repo::guest_repo::RepoError;

    #[test]
    fn categories_cover_the_three_outward_classes() {
        let bad = ServiceError::from(ValidationError::MissingField("firstName"));
        let missing = ServiceError::from(NotFound::Guest(7));
        let internal = ServiceError::from(RepoError::LockPoisoned);
        assert_eq!(bad.category(), ErrorCategory::BadRequest);
        assert_eq!(missing.category(), ErrorCategory::NotFound);
        assert_eq!(internal.category(), ErrorCategory::Internal);
    }

    #[test]
    fn require_text_rejects_whitespace() {
        assert_eq!(
            require_text("name", "  \t"),
            Err(ValidationError::MissingField("name"))
        );
        assert!(require_text("name", " Tom ").is_ok());
    }

    #[test]
    fn non_blank_trims_and_drops_empty() {
        assert_eq!(non_blank(Some("  cousin ")), Some("cousin".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
