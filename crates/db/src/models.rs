use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::eyre;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trainbook_core::models::{
    availability::Availability,
    booking::{BookedSlot, Booking, BookingStatus},
    identity::Role,
    slot::{Slot, SlotStatus},
};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailability {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: Uuid,
    pub availability_id: Uuid,
    pub trainer_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub booking_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub trainee_id: Uuid,
    pub slot_id: Uuid,
    pub status: String,
    pub notes: Option<String>,
    pub cancel_reason: Option<String>,
    pub canceled_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A booking row joined with its slot's columns.
#[derive(Debug, Clone, FromRow)]
pub struct DbBookedSlot {
    #[sqlx(flatten)]
    pub booking: DbBooking,
    pub availability_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_status: String,
    pub slot_booking_id: Option<Uuid>,
}

impl From<DbAvailability> for Availability {
    fn from(row: DbAvailability) -> Self {
        Self {
            id: row.id,
            trainer_id: row.trainer_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            slot_duration_minutes: row.slot_duration_minutes,
            created_at: row.created_at,
        }
    }
}

impl TryFrom<DbSlot> for Slot {
    type Error = eyre::Report;

    fn try_from(row: DbSlot) -> eyre::Result<Self> {
        Ok(Self {
            id: row.id,
            availability_id: row.availability_id,
            trainer_id: row.trainer_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row.status.parse::<SlotStatus>().map_err(|e: String| eyre!(e))?,
            booking_id: row.booking_id,
        })
    }
}

impl TryFrom<DbBooking> for Booking {
    type Error = eyre::Report;

    fn try_from(row: DbBooking) -> eyre::Result<Self> {
        let canceled_by = row
            .canceled_by
            .as_deref()
            .map(str::parse::<Role>)
            .transpose()
            .map_err(|e: String| eyre!(e))?;

        Ok(Self {
            id: row.id,
            trainer_id: row.trainer_id,
            trainee_id: row.trainee_id,
            slot_id: row.slot_id,
            status: row.status.parse::<BookingStatus>().map_err(|e: String| eyre!(e))?,
            notes: row.notes,
            cancel_reason: row.cancel_reason,
            canceled_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<DbBookedSlot> for BookedSlot {
    type Error = eyre::Report;

    fn try_from(row: DbBookedSlot) -> eyre::Result<Self> {
        let slot = DbSlot {
            id: row.booking.slot_id,
            availability_id: row.availability_id,
            trainer_id: row.booking.trainer_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row.slot_status,
            booking_id: row.slot_booking_id,
        };

        Ok(Self {
            booking: row.booking.try_into()?,
            slot: slot.try_into()?,
        })
    }
}
