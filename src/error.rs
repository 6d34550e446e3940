//! Error taxonomy for the booking core.
//!
//! Validation failures and not-found conditions surface to the caller as
//! discrete, user-actionable rejections. Storage failures mostly degrade in
//! place (see `store`); only id issuance propagates here.

use thiserror::Error;

use crate::models::RecordId;
use crate::store::StoreError;

/// Rejection reasons produced by the slot validator.
///
/// Raised before any write — when one of these surfaces, the entity store
/// has not been touched. Retrying with the same input reproduces the same
/// failure, so callers should correct the request instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("cannot book an appointment in the past")]
    PastDate,

    #[error("appointment falls outside business hours (08:00-18:00)")]
    OutOfBusinessHours,

    #[error("time slot conflicts with appointment {conflicting_id}")]
    OverlapConflict { conflicting_id: RecordId },
}

/// Failures surfaced by appointment repository operations.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("appointment not found: {0}")]
    NotFound(RecordId),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}
