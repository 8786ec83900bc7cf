use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slot::Slot;

/// A trainer-declared time window on a date.
///
/// Immutable once its slots exist; the window never crosses midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i32,
    pub created_at: DateTime<Utc>,
}

impl Availability {
    /// Half-open interval intersection on the same trainer and date.
    pub fn overlaps(&self, other: &Availability) -> bool {
        self.trainer_id == other.trainer_id
            && self.date == other.date
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAvailabilityRequest {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWithSlots {
    pub availability: Availability,
    pub slots: Vec<Slot>,
}
