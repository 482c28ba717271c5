//! Admin login credentials.
//!
//! Passwords are stored and compared as plain text. They are never
//! serialized outward.

use super::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: RecordId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: Timestamp,
}

impl Admin {
    /// Plaintext equality check against the stored password.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

/// Insert input for [`Admin`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewAdmin {
    pub username: String,
    pub password: String,
}

impl NewAdmin {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
