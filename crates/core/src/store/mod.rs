//! # Persistence Seam
//!
//! Traits the booking components use to reach storage. Each mutating method
//! is a single atomic unit: the status predicate and the write commit together
//! or not at all. A `None` result from a conditional method means the
//! predicate did not hold (zero rows affected); callers re-read to explain why.
//!
//! `trainbook-db` implements these over PostgreSQL. [`memory::InMemoryStore`]
//! implements them behind one lock for tests and embedding.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{
    availability::Availability,
    booking::{BookedSlot, Booking, BookingStatus},
    identity::{Party, Role},
    slot::Slot,
};

/// Outcome of inserting an availability window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityInsert {
    Inserted,
    /// An existing window for the same trainer and date intersects the new one.
    Overlapping(Availability),
}

#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    /// Stores the window and its slots in one commit, unless it overlaps an
    /// existing window for the same trainer and date.
    async fn insert_availability(
        &self,
        availability: &Availability,
        slots: &[Slot],
    ) -> eyre::Result<AvailabilityInsert>;

    async fn get_availability(&self, id: Uuid) -> eyre::Result<Option<Availability>>;

    /// Slots of every window dated `from` or later, ordered by date then start.
    async fn list_upcoming_slots(&self, trainer_id: Uuid, from: NaiveDate) -> eyre::Result<Vec<Slot>>;
}

#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn get_slot(&self, id: Uuid) -> eyre::Result<Option<Slot>>;

    /// Ordered by start time.
    async fn list_slots_by_date(&self, trainer_id: Uuid, date: NaiveDate) -> eyre::Result<Vec<Slot>>;

    /// Ordered by start time.
    async fn list_slots_by_availability(&self, availability_id: Uuid) -> eyre::Result<Vec<Slot>>;

    /// `available -> canceled`.
    async fn cancel_slot(&self, id: Uuid) -> eyre::Result<Option<Slot>>;

    /// `available -> booked`, persisting `booking` in the same commit and
    /// pointing the slot at it.
    async fn claim_slot(&self, slot_id: Uuid, booking: &Booking) -> eyre::Result<Option<Slot>>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn get_booking(&self, id: Uuid) -> eyre::Result<Option<Booking>>;

    /// Ordered by slot date then start time.
    async fn list_bookings(
        &self,
        party: Party,
        status: Option<BookingStatus>,
    ) -> eyre::Result<Vec<BookedSlot>>;

    /// `confirmed -> canceled`, releasing the slot back to `available` in the
    /// same commit.
    async fn cancel_booking(
        &self,
        id: Uuid,
        reason: &str,
        canceled_by: Role,
        now: DateTime<Utc>,
    ) -> eyre::Result<Option<Booking>>;

    /// `confirmed -> completed`, storing `notes` when given.
    async fn complete_booking(
        &self,
        id: Uuid,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> eyre::Result<Option<Booking>>;
}

/// Everything the booking components need from storage.
pub trait Store: AvailabilityStore + SlotStore + BookingStore {}

impl<T> Store for T where T: AvailabilityStore + SlotStore + BookingStore + ?Sized {}
