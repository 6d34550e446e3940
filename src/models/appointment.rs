use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::AppointmentStatus;
use super::RecordId;

/// A booked service slot.
///
/// `pet_name` and `service_name` are snapshots taken from the referenced
/// records at write time — they are display conveniences and are not kept
/// in sync if the referenced record is later renamed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: RecordId,
    #[serde(default)]
    pub pet_id: Option<RecordId>,
    #[serde(default)]
    pub service_id: Option<RecordId>,
    /// Start instant, local wall-clock.
    pub date: NaiveDateTime,
    /// Older stored records predate this field and read back as scheduled.
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub pet_name: String,
    #[serde(default)]
    pub service_name: String,
}

/// Payload for creating an appointment. Referenced ids are not required to
/// exist: a missing service only degrades the duration to the default.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAppointment {
    pub pet_id: Option<RecordId>,
    pub service_id: Option<RecordId>,
    pub date: NaiveDateTime,
    pub notes: Option<String>,
}

/// Partial update for an appointment. Every present field replaces the
/// stored value; absent fields leave it untouched. Unknown fields are a
/// deserialization error rather than silently merged.
///
/// `status` may be supplied explicitly, but a cancelled appointment never
/// returns to scheduled — the repository pins it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppointmentPatch {
    pub pet_id: Option<RecordId>,
    pub service_id: Option<RecordId>,
    pub date: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub status: Option<AppointmentStatus>,
}
