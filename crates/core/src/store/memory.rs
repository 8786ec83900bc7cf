use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use eyre::eyre;
use uuid::Uuid;

use super::{AvailabilityInsert, AvailabilityStore, BookingStore, SlotStore};
use crate::models::{
    availability::Availability,
    booking::{BookedSlot, Booking, BookingStatus},
    identity::{Party, Role},
    slot::{Slot, SlotStatus},
};

#[derive(Debug, Default)]
struct MemoryState {
    availabilities: HashMap<Uuid, Availability>,
    slots: HashMap<Uuid, Slot>,
    bookings: HashMap<Uuid, Booking>,
}

/// Process-local store. Every method runs under a single lock, which gives the
/// same all-or-nothing behaviour as a conditional update in one transaction.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> eyre::Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| eyre!("in-memory store lock poisoned"))
    }
}

fn sorted_by_start(mut slots: Vec<Slot>) -> Vec<Slot> {
    slots.sort_by_key(|slot| (slot.date, slot.start_time));
    slots
}

#[async_trait]
impl AvailabilityStore for InMemoryStore {
    async fn insert_availability(
        &self,
        availability: &Availability,
        slots: &[Slot],
    ) -> eyre::Result<AvailabilityInsert> {
        let mut state = self.lock()?;

        if let Some(existing) = state
            .availabilities
            .values()
            .find(|existing| existing.overlaps(availability))
        {
            return Ok(AvailabilityInsert::Overlapping(existing.clone()));
        }

        state
            .availabilities
            .insert(availability.id, availability.clone());
        for slot in slots {
            state.slots.insert(slot.id, slot.clone());
        }

        Ok(AvailabilityInsert::Inserted)
    }

    async fn get_availability(&self, id: Uuid) -> eyre::Result<Option<Availability>> {
        Ok(self.lock()?.availabilities.get(&id).cloned())
    }

    async fn list_upcoming_slots(&self, trainer_id: Uuid, from: NaiveDate) -> eyre::Result<Vec<Slot>> {
        let state = self.lock()?;
        let slots = state
            .slots
            .values()
            .filter(|slot| slot.trainer_id == trainer_id && slot.date >= from)
            .cloned()
            .collect();
        Ok(sorted_by_start(slots))
    }
}

#[async_trait]
impl SlotStore for InMemoryStore {
    async fn get_slot(&self, id: Uuid) -> eyre::Result<Option<Slot>> {
        Ok(self.lock()?.slots.get(&id).cloned())
    }

    async fn list_slots_by_date(&self, trainer_id: Uuid, date: NaiveDate) -> eyre::Result<Vec<Slot>> {
        let state = self.lock()?;
        let slots = state
            .slots
            .values()
            .filter(|slot| slot.trainer_id == trainer_id && slot.date == date)
            .cloned()
            .collect();
        Ok(sorted_by_start(slots))
    }

    async fn list_slots_by_availability(&self, availability_id: Uuid) -> eyre::Result<Vec<Slot>> {
        let state = self.lock()?;
        let slots = state
            .slots
            .values()
            .filter(|slot| slot.availability_id == availability_id)
            .cloned()
            .collect();
        Ok(sorted_by_start(slots))
    }

    async fn cancel_slot(&self, id: Uuid) -> eyre::Result<Option<Slot>> {
        let mut state = self.lock()?;
        match state.slots.get_mut(&id) {
            Some(slot) if slot.is_available() => {
                slot.status = SlotStatus::Canceled;
                Ok(Some(slot.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn claim_slot(&self, slot_id: Uuid, booking: &Booking) -> eyre::Result<Option<Slot>> {
        let mut state = self.lock()?;
        let claimed = match state.slots.get_mut(&slot_id) {
            Some(slot) if slot.is_available() => {
                slot.status = SlotStatus::Booked;
                slot.booking_id = Some(booking.id);
                slot.clone()
            }
            _ => return Ok(None),
        };
        state.bookings.insert(booking.id, booking.clone());
        Ok(Some(claimed))
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn get_booking(&self, id: Uuid) -> eyre::Result<Option<Booking>> {
        Ok(self.lock()?.bookings.get(&id).cloned())
    }

    async fn list_bookings(
        &self,
        party: Party,
        status: Option<BookingStatus>,
    ) -> eyre::Result<Vec<BookedSlot>> {
        let state = self.lock()?;
        let mut booked = Vec::new();
        for booking in state.bookings.values() {
            let belongs = match party {
                Party::Trainer(id) => booking.trainer_id == id,
                Party::Trainee(id) => booking.trainee_id == id,
            };
            if !belongs || status.is_some_and(|status| booking.status != status) {
                continue;
            }
            let slot = state
                .slots
                .get(&booking.slot_id)
                .ok_or_else(|| eyre!("booking {} references missing slot {}", booking.id, booking.slot_id))?;
            booked.push(BookedSlot {
                booking: booking.clone(),
                slot: slot.clone(),
            });
        }
        booked.sort_by_key(|entry| (entry.slot.date, entry.slot.start_time, entry.booking.created_at));
        Ok(booked)
    }

    async fn cancel_booking(
        &self,
        id: Uuid,
        reason: &str,
        canceled_by: Role,
        now: DateTime<Utc>,
    ) -> eyre::Result<Option<Booking>> {
        let mut state = self.lock()?;
        let canceled = match state.bookings.get_mut(&id) {
            Some(booking) if booking.status == BookingStatus::Confirmed => {
                booking.status = BookingStatus::Canceled;
                booking.cancel_reason = Some(reason.to_string());
                booking.canceled_by = Some(canceled_by);
                booking.updated_at = now;
                booking.clone()
            }
            _ => return Ok(None),
        };

        if let Some(slot) = state.slots.get_mut(&canceled.slot_id) {
            if slot.booking_id == Some(canceled.id) {
                slot.status = SlotStatus::Available;
                slot.booking_id = None;
            }
        }

        Ok(Some(canceled))
    }

    async fn complete_booking(
        &self,
        id: Uuid,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> eyre::Result<Option<Booking>> {
        let mut state = self.lock()?;
        match state.bookings.get_mut(&id) {
            Some(booking) if booking.status == BookingStatus::Confirmed => {
                booking.status = BookingStatus::Completed;
                if notes.is_some() {
                    booking.notes = notes;
                }
                booking.updated_at = now;
                Ok(Some(booking.clone()))
            }
            _ => Ok(None),
        }
    }
}
