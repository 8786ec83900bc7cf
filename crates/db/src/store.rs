use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use eyre::Result;
use trainbook_core::{
    models::{
        availability::Availability,
        booking::{BookedSlot, Booking, BookingStatus},
        identity::{Party, Role},
        slot::Slot,
    },
    store::{AvailabilityInsert, AvailabilityStore, BookingStore, SlotStore},
};
use uuid::Uuid;

use crate::{
    DbPool,
    repositories::{availability, booking, slot},
};

/// PostgreSQL-backed implementation of the booking store traits.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_slots(rows: Vec<crate::models::DbSlot>) -> Result<Vec<Slot>> {
    rows.into_iter().map(Slot::try_from).collect()
}

#[async_trait]
impl AvailabilityStore for PgStore {
    async fn insert_availability(
        &self,
        availability: &Availability,
        slots: &[Slot],
    ) -> Result<AvailabilityInsert> {
        let outcome = availability::create_availability(&self.pool, availability, slots).await?;
        Ok(match outcome {
            Some(existing) => AvailabilityInsert::Overlapping(existing.into()),
            None => AvailabilityInsert::Inserted,
        })
    }

    async fn get_availability(&self, id: Uuid) -> Result<Option<Availability>> {
        let row = availability::get_availability_by_id(&self.pool, id).await?;
        Ok(row.map(Availability::from))
    }

    async fn list_upcoming_slots(&self, trainer_id: Uuid, from: NaiveDate) -> Result<Vec<Slot>> {
        into_slots(availability::get_upcoming_slots_by_trainer(&self.pool, trainer_id, from).await?)
    }
}

#[async_trait]
impl SlotStore for PgStore {
    async fn get_slot(&self, id: Uuid) -> Result<Option<Slot>> {
        slot::get_slot_by_id(&self.pool, id)
            .await?
            .map(Slot::try_from)
            .transpose()
    }

    async fn list_slots_by_date(&self, trainer_id: Uuid, date: NaiveDate) -> Result<Vec<Slot>> {
        into_slots(slot::get_slots_by_trainer_and_date(&self.pool, trainer_id, date).await?)
    }

    async fn list_slots_by_availability(&self, availability_id: Uuid) -> Result<Vec<Slot>> {
        into_slots(slot::get_slots_by_availability_id(&self.pool, availability_id).await?)
    }

    async fn cancel_slot(&self, id: Uuid) -> Result<Option<Slot>> {
        slot::cancel_slot(&self.pool, id)
            .await?
            .map(Slot::try_from)
            .transpose()
    }

    async fn claim_slot(&self, slot_id: Uuid, booking: &Booking) -> Result<Option<Slot>> {
        slot::claim_slot(&self.pool, slot_id, booking)
            .await?
            .map(Slot::try_from)
            .transpose()
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>> {
        booking::get_booking_by_id(&self.pool, id)
            .await?
            .map(Booking::try_from)
            .transpose()
    }

    async fn list_bookings(
        &self,
        party: Party,
        status: Option<BookingStatus>,
    ) -> Result<Vec<BookedSlot>> {
        booking::get_bookings_for_party(&self.pool, party, status)
            .await?
            .into_iter()
            .map(BookedSlot::try_from)
            .collect()
    }

    async fn cancel_booking(
        &self,
        id: Uuid,
        reason: &str,
        canceled_by: Role,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        booking::cancel_booking(&self.pool, id, reason, canceled_by, now)
            .await?
            .map(Booking::try_from)
            .transpose()
    }

    async fn complete_booking(
        &self,
        id: Uuid,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        booking::complete_booking(&self.pool, id, notes, now)
            .await?
            .map(Booking::try_from)
            .transpose()
    }
}
