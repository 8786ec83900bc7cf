use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    allocation,
    errors::{BookingError, BookingResult},
    models::{
        availability::Availability,
        identity::Caller,
        slot::{Slot, SlotStatus},
    },
    store::Store,
};

/// Slot generation and the read/remove operations on generated slots.
#[derive(Clone)]
pub struct SlotAllocator {
    store: Arc<dyn Store>,
}

impl SlotAllocator {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Tiles `availability` into back-to-back slots of its slot duration,
    /// dropping any remainder shorter than one slot.
    pub fn generate_slots(availability: &Availability) -> Vec<Slot> {
        allocation::generate_slots(availability)
    }

    /// # Errors
    ///
    /// * `BookingError::NotFound` - the trainer has no slots on `date`
    pub async fn get_slots_by_date(&self, trainer_id: Uuid, date: NaiveDate) -> BookingResult<Vec<Slot>> {
        let slots = self
            .store
            .list_slots_by_date(trainer_id, date)
            .await
            .map_err(BookingError::Database)?;

        if slots.is_empty() {
            return Err(BookingError::NotFound(format!(
                "No slots for trainer {} on {}",
                trainer_id, date
            )));
        }

        Ok(slots)
    }

    /// Withdraws an unbooked slot.
    ///
    /// # Errors
    ///
    /// * `BookingError::NotFound` - unknown slot
    /// * `BookingError::Authorization` - caller is not the owning trainer
    /// * `BookingError::Conflict` - the slot holds an active booking
    /// * `BookingError::State` - the slot is already canceled
    pub async fn cancel_slot(&self, caller: Caller, slot_id: Uuid) -> BookingResult<Slot> {
        let slot = self.load(slot_id).await?;
        if !caller.is_trainer() || slot.trainer_id != caller.user_id {
            return Err(BookingError::Authorization(
                "Only the trainer who owns this slot can remove it".to_string(),
            ));
        }

        if let Some(canceled) = self
            .store
            .cancel_slot(slot_id)
            .await
            .map_err(BookingError::Database)?
        {
            info!(slot_id = %slot_id, "slot canceled");
            return Ok(canceled);
        }

        // The conditional update matched nothing; report the state it found.
        let current = self.load(slot_id).await?;
        warn!(slot_id = %slot_id, status = %current.status, "slot cancel rejected");
        match current.status {
            SlotStatus::Booked => Err(BookingError::Conflict(
                "Cannot remove a slot with an active booking".to_string(),
            )),
            SlotStatus::Canceled => Err(BookingError::slot_state("Slot is already canceled")),
            SlotStatus::Available => Err(BookingError::Conflict(
                "Slot changed while it was being removed, try again".to_string(),
            )),
        }
    }

    async fn load(&self, slot_id: Uuid) -> BookingResult<Slot> {
        self.store
            .get_slot(slot_id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| BookingError::NotFound(format!("Slot with ID {} not found", slot_id)))
    }
}
