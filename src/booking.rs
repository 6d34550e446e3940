//! Slot validation — the decision function behind every booking mutation.
//!
//! Checks run in a fixed order and the first failure wins: past date, then
//! business hours, then overlap against every active appointment. Windows
//! are half-open `[start, end)` minutes of day, so an appointment ending at
//! 10:00 does not conflict with one starting at 10:00 — back-to-back
//! bookings are legal by design.

use chrono::{NaiveDateTime, Timelike};

use crate::error::ValidationError;
use crate::models::{Appointment, RecordId, Service};

/// Opening time, minutes since midnight (08:00).
pub const OPEN_MIN: i64 = 8 * 60;
/// Closing time, minutes since midnight (18:00). An appointment may end
/// exactly here but not run past it.
pub const CLOSE_MIN: i64 = 18 * 60;
/// Fallback duration when the service is absent or unknown.
pub const DEFAULT_DURATION_MIN: i64 = 60;

/// A proposed slot: everything the validator needs to know about a booking
/// before it exists.
#[derive(Debug, Clone, Copy)]
pub struct SlotCandidate {
    pub service_id: Option<RecordId>,
    pub date: NaiveDateTime,
}

/// Duration in minutes for a service id.
///
/// Total by construction: an absent or unknown id degrades to
/// [`DEFAULT_DURATION_MIN`], since the duration only feeds conflict
/// geometry and should never block a booking on its own.
pub fn service_duration(services: &[Service], service_id: Option<RecordId>) -> i64 {
    service_id
        .and_then(|id| services.iter().find(|s| s.id == id))
        .map(|s| s.duration)
        .unwrap_or(DEFAULT_DURATION_MIN)
}

/// `[start, end)` window in minutes since midnight on the slot's own day.
fn slot_window(date: NaiveDateTime, duration: i64) -> (i64, i64) {
    let time = date.time();
    let start = i64::from(time.hour()) * 60 + i64::from(time.minute());
    (start, start + duration)
}

/// Decide whether a candidate slot may be booked.
///
/// `exclude` names the appointment being updated, if any, so a record does
/// not conflict with itself when its timing is unchanged. Cancelled
/// appointments never participate in the overlap scan.
pub fn validate_slot(
    candidate: SlotCandidate,
    existing: &[Appointment],
    services: &[Service],
    exclude: Option<RecordId>,
    now: NaiveDateTime,
) -> Result<(), ValidationError> {
    if candidate.date < now {
        return Err(ValidationError::PastDate);
    }

    let duration = service_duration(services, candidate.service_id);
    let (start, end) = slot_window(candidate.date, duration);
    if start < OPEN_MIN || end > CLOSE_MIN {
        return Err(ValidationError::OutOfBusinessHours);
    }

    for other in existing {
        if exclude == Some(other.id) || other.status.is_cancelled() {
            continue;
        }
        let other_duration = service_duration(services, other.service_id);
        let (other_start, other_end) = slot_window(other.date, other_duration);
        if start < other_end && end > other_start {
            return Err(ValidationError::OverlapConflict { conflicting_id: other.id });
        }
    }

    Ok(())
}
