//! Guest-management core for the invitation site.
//! Owns guests, RSVPs, the guestbook, admin credentials and dashboard
//! statistics behind one storage contract with two backends.

pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, StorageBackend};
pub use export::{export_file_name, write_guest_csv, ExportError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::admin::{Admin, NewAdmin};
pub use model::guest::{Guest, GuestWithPlusGuests, NewGuest, NewPlusGuest, PlusGuest, RsvpStatus};
pub use model::guestbook::{GuestbookMessage, NewGuestbookMessage};
pub use model::stats::GuestStatistics;
pub use model::{RecordId, Timestamp};
pub use repo::guest_repo::{GuestRepository, RepoError, RepoResult};
pub use repo::memory_guest_repo::InMemoryGuestRepository;
pub use repo::sqlite_guest_repo::SqliteGuestRepository;
pub use service::admin_service::{AdminLogin, AdminService};
pub use service::guestbook_service::GuestbookService;
pub use service::rsvp_service::{GuestSearch, PlusGuestInput, RsvpService, RsvpSubmission};
pub use service::{ErrorCategory, NotFound, ServiceError, ServiceResult, ValidationError};
