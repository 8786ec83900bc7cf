use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    models::{
        booking::Booking,
        slot::{Slot, SlotStatus},
    },
    store::Store,
};

/// Exclusive claim of a slot.
///
/// There is no lock here: exclusivity comes entirely from the store's
/// conditional `available -> booked` update, so it holds across any number of
/// callers, processes and machines.
#[derive(Clone)]
pub struct ConflictGuard {
    store: Arc<dyn Store>,
}

impl ConflictGuard {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Claims `slot_id` for `booking`. Exactly one concurrent caller wins.
    ///
    /// # Errors
    ///
    /// * `BookingError::SlotUnavailable` - the slot is not `available`
    /// * `BookingError::NotFound` - the slot does not exist
    pub async fn claim(&self, slot_id: Uuid, booking: &Booking) -> BookingResult<Slot> {
        if let Some(slot) = self
            .store
            .claim_slot(slot_id, booking)
            .await
            .map_err(BookingError::Database)?
        {
            debug!(slot_id = %slot_id, booking_id = %booking.id, "slot claimed");
            return Ok(slot);
        }

        let current = self
            .store
            .get_slot(slot_id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| BookingError::NotFound(format!("Slot with ID {} not found", slot_id)))?;

        debug!(slot_id = %slot_id, status = %current.status, "slot claim lost");
        let message = match current.status {
            SlotStatus::Canceled => "This slot was removed by the trainer, choose another",
            SlotStatus::Booked | SlotStatus::Available => {
                "This slot was just booked by someone else, choose another"
            }
        };
        Err(BookingError::SlotUnavailable(message.to_string()))
    }
}
