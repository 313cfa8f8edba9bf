use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sale status of a departure
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepartureStatus {
    Open,
    Closed,
}

/// One scheduled trip instance with a fixed seat quota.
///
/// The schedule itself is created by the portal; this engine reads `quota`
/// and owns the reserved-seat counter through the quota ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Departure {
    pub id: Uuid,
    pub name: String,
    pub quota: u32,
    pub departs_on: DateTime<Utc>,
    pub status: DepartureStatus,
    pub created_at: DateTime<Utc>,
}

impl Departure {
    pub fn new(id: Uuid, name: String, quota: u32, departs_on: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            quota,
            departs_on,
            status: DepartureStatus::Open,
            created_at: Utc::now(),
        }
    }
}
