//! Domain records for the invitation guest list.
//!
//! # Responsibility
//! - Define the four stored record kinds and their insert inputs.
//! - Define the derived statistics read model.
//!
//! # Invariants
//! - Every stored record is identified by a backend-assigned `RecordId`.
//! - Timestamps are Unix epoch milliseconds.
//! - Serialized field names are camelCase.

use std::time::{SystemTime, UNIX_EPOCH};

pub mod admin;
pub mod guest;
pub mod guestbook;
pub mod stats;

/// Backend-assigned identifier shared by all record kinds.
pub type RecordId = i64;

/// Unix epoch milliseconds.
pub type Timestamp = i64;

/// Returns the current wall-clock time in epoch milliseconds.
///
/// Clocks set before 1970 collapse to `0` instead of failing.
pub fn now_epoch_ms() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::now_epoch_ms;

    #[test]
    fn clock_is_after_2020() {
        assert!(now_epoch_ms() > 1_577_836_800_000);
    }
}
