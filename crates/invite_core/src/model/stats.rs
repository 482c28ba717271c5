//! Derived guest statistics.
//!
//! # Invariants
//! - `attending_guests + not_attending_guests + pending_rsvps == total_guests`.
//! - Figures are recomputed from a full scan on every request.

use super::guest::RsvpStatus;
use serde::{Deserialize, Serialize};

/// Dashboard counters over the whole guest list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestStatistics {
    pub total_guests: u64,
    pub attending_guests: u64,
    pub not_attending_guests: u64,
    #[serde(rename = "pendingRSVPs")]
    pub pending_rsvps: u64,
    pub total_plus_guests: u64,
}

impl GuestStatistics {
    /// Tallies one RSVP status per guest plus the number of plus-guest rows.
    pub fn tally<I>(statuses: I, total_plus_guests: u64) -> Self
    where
        I: IntoIterator<Item = Option<RsvpStatus>>,
    {
        let mut stats = Self {
            total_plus_guests,
            ..Self::default()
        };
        for status in statuses {
            stats.total_guests += 1;
            match status {
                Some(RsvpStatus::Attending) => stats.attending_guests += 1,
                Some(RsvpStatus::NotAttending) => stats.not_attending_guests += 1,
                None => stats.pending_rsvps += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::{GuestStatistics, RsvpStatus};

    #[test]
    fn tally_partitions_every_guest() {
        let stats = GuestStatistics::tally(
            [
                Some(RsvpStatus::Attending),
                None,
                Some(RsvpStatus::NotAttending),
                Some(RsvpStatus::Attending),
            ],
            3,
        );
        assert_eq!(stats.total_guests, 4);
        assert_eq!(stats.attending_guests, 2);
        assert_eq!(stats.not_attending_guests, 1);
        assert_eq!(stats.pending_rsvps, 1);
        assert_eq!(stats.total_plus_guests, 3);
    }

    #[test]
    fn empty_tally_is_all_zero() {
        assert_eq!(
            GuestStatistics::tally(std::iter::empty(), 0),
            GuestStatistics::default()
        );
    }
}
