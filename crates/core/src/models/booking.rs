use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{identity::Role, slot::Slot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Canceled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Canceled => "canceled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Canceled and completed bookings never transition again.
    pub fn is_terminal(&self) -> bool {
        match self {
            BookingStatus::Confirmed => false,
            BookingStatus::Canceled | BookingStatus::Completed => true,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "canceled" => Ok(BookingStatus::Canceled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(format!("unknown booking status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub trainee_id: Uuid,
    pub slot_id: Uuid,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub cancel_reason: Option<String>,
    pub canceled_by: Option<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// A fresh confirmed booking for `slot`, not yet persisted.
    pub fn confirmed(slot: &Slot, trainee_id: Uuid, notes: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            trainer_id: slot.trainer_id,
            trainee_id,
            slot_id: slot.id,
            status: BookingStatus::Confirmed,
            notes,
            cancel_reason: None,
            canceled_by: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A booking joined with the slot it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookedSlot {
    pub booking: Booking,
    pub slot: Slot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counterpart {
    pub id: Uuid,
    pub role: Role,
}

/// Booking view for listings: slot time range plus the other party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub counterpart: Counterpart,
}

impl BookingDetails {
    /// Builds the view as seen by `viewer`; the counterpart is the other side.
    pub fn for_viewer(booked: BookedSlot, viewer: Role) -> Self {
        let counterpart = match viewer {
            Role::Trainer => Counterpart {
                id: booked.booking.trainee_id,
                role: Role::Trainee,
            },
            Role::Trainee => Counterpart {
                id: booked.booking.trainer_id,
                role: Role::Trainer,
            },
        };

        Self {
            booking: booked.booking,
            date: booked.slot.date,
            start_time: booked.slot.start_time,
            end_time: booked.slot.end_time,
            counterpart,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSlotRequest {
    pub trainee_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteBookingRequest {
    pub feedback: Option<String>,
}
