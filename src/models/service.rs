use serde::{Deserialize, Serialize};

use super::RecordId;

/// A grooming/care service offered by the shop. Read-only from the booking
/// core's perspective: only `duration` and `name` feed into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: RecordId,
    pub name: String,
    /// Minutes one booking of this service occupies.
    pub duration: i64,
    pub price: f64,
}

/// Payload for adding a service to the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct NewService {
    pub name: String,
    pub duration: i64,
    pub price: f64,
}
