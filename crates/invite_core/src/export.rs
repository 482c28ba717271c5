//! CSV export of the guest list for the admin dashboard.
//!
//! Columns: First Name, Last Name, Role, Attendance, Message, Plus Guests,
//! Submitted At. Unanswered RSVPs read `Pending`; dates are UTC `YYYY-MM-DD`.

use crate::model::guest::GuestWithPlusGuests;
use crate::model::Timestamp;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

const HEADER: [&str; 7] = [
    "First Name",
    "Last Name",
    "Role",
    "Attendance",
    "Message",
    "Plus Guests",
    "Submitted At",
];

const PENDING: &str = "Pending";

#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Writes a header row plus one row per guest.
pub fn write_guest_csv<W: Write>(
    guests: &[GuestWithPlusGuests],
    writer: W,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for entry in guests {
        let guest = &entry.guest;
        let attendance = guest.rsvp_status.map_or(PENDING, |status| status.as_str());
        let plus_guest_count = entry.plus_guests.len().to_string();
        let submitted = guest.submitted_at.map(format_date).unwrap_or_default();
        csv_writer.write_record([
            guest.first_name.as_str(),
            guest.last_name.as_str(),
            guest.role.as_str(),
            attendance,
            guest.personal_message.as_deref().unwrap_or(""),
            plus_guest_count.as_str(),
            submitted.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Download name for an export taken at `now`.
pub fn export_file_name(now: Timestamp) -> String {
    format!("guest-list-{}.csv", format_date(now))
}

fn format_date(epoch_ms: Timestamp) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, format_date};

    #[test]
    fn dates_are_utc_calendar_days() {
        // 2025-06-14T23:59:59.999Z
        assert_eq!(format_date(1_749_945_599_999), "2025-06-14");
        assert_eq!(format_date(0), "1970-01-01");
    }

    #[test]
    fn export_file_name_embeds_date() {
        assert_eq!(
            export_file_name(1_749_945_600_000),
            "guest-list-2025-06-15.csv"
        );
    }
}
