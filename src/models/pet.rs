use serde::{Deserialize, Serialize};

use super::RecordId;

/// A client's pet. `owner_name` is snapshotted at write time, same policy
/// as the display fields on [`super::Appointment`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub owner_id: Option<RecordId>,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub notes: String,
}

/// Payload for registering a pet.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPet {
    pub name: String,
    pub owner_id: Option<RecordId>,
    pub owner_name: Option<String>,
    pub breed: Option<String>,
    pub notes: Option<String>,
}
