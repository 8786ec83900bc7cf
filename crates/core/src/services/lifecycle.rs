//! # Booking Lifecycle
//!
//! ```text
//! confirmed --cancel_booking (trainer or trainee, reason)--> canceled
//! confirmed --complete_booking (trainer, feedback?)-------> completed
//! ```
//!
//! Both target states are terminal. Every transition is a conditional update
//! on `status = confirmed`; losing that race surfaces as a state error rather
//! than a silent success.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::guard::ConflictGuard;
use crate::{
    errors::{BookingError, BookingResult},
    models::{
        booking::{BookSlotRequest, BookedSlot, Booking, BookingDetails, BookingStatus},
        identity::{Caller, Party, Role},
    },
    store::Store,
};

/// Minimum trimmed length of a cancellation reason.
pub const MIN_CANCEL_REASON_LEN: usize = 10;
/// Maximum length of booking notes and completion feedback.
pub const MAX_NOTES_LEN: usize = 2000;

#[derive(Clone)]
pub struct BookingLifecycle {
    store: Arc<dyn Store>,
    guard: ConflictGuard,
}

impl BookingLifecycle {
    pub fn new(store: Arc<dyn Store>) -> Self {
        let guard = ConflictGuard::new(store.clone());
        Self { store, guard }
    }

    /// Books a slot. The only way a booking comes into existence.
    ///
    /// Trainees book for themselves; a trainer may book one of their own slots
    /// on behalf of a trainee named in the request.
    ///
    /// # Errors
    ///
    /// * `BookingError::NotFound` - unknown slot
    /// * `BookingError::Authorization` - booking for someone else, or a
    ///   trainer booking a slot they don't own
    /// * `BookingError::Validation` - trainer did not name a trainee, or notes
    ///   too long
    /// * `BookingError::SlotUnavailable` - the slot is taken or withdrawn
    pub async fn book_slot(
        &self,
        caller: Caller,
        slot_id: Uuid,
        request: BookSlotRequest,
    ) -> BookingResult<Booking> {
        let slot = self
            .store
            .get_slot(slot_id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| BookingError::NotFound(format!("Slot with ID {} not found", slot_id)))?;

        let trainee_id = match caller.role {
            Role::Trainee => match request.trainee_id {
                Some(id) if id != caller.user_id => {
                    return Err(BookingError::Authorization(
                        "Trainees can only book slots for themselves".to_string(),
                    ));
                }
                _ => caller.user_id,
            },
            Role::Trainer => {
                if slot.trainer_id != caller.user_id {
                    return Err(BookingError::Authorization(
                        "Trainers can only book their own slots".to_string(),
                    ));
                }
                match request.trainee_id {
                    Some(id) if id == caller.user_id => {
                        return Err(BookingError::Validation(
                            "A trainer cannot book their own slot as the trainee".to_string(),
                        ));
                    }
                    Some(id) => id,
                    None => {
                        return Err(BookingError::Validation(
                            "traineeId is required when a trainer books a slot".to_string(),
                        ));
                    }
                }
            }
        };

        let notes = normalize_notes(request.notes)?;
        let booking = Booking::confirmed(&slot, trainee_id, notes, Utc::now());
        self.guard.claim(slot_id, &booking).await?;

        info!(
            booking_id = %booking.id,
            slot_id = %slot_id,
            trainee_id = %trainee_id,
            "booking confirmed"
        );
        Ok(booking)
    }

    /// Cancels a confirmed booking; the slot becomes bookable again.
    ///
    /// # Errors
    ///
    /// * `BookingError::Validation` - reason empty or under 10 characters
    /// * `BookingError::NotFound` - unknown booking
    /// * `BookingError::Authorization` - caller is not a party to the booking
    /// * `BookingError::State` - booking is not `confirmed`
    pub async fn cancel_booking(
        &self,
        caller: Caller,
        booking_id: Uuid,
        reason: &str,
    ) -> BookingResult<Booking> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(BookingError::Validation(
                "A cancellation reason is required".to_string(),
            ));
        }
        if reason.chars().count() < MIN_CANCEL_REASON_LEN {
            return Err(BookingError::Validation(format!(
                "Cancellation reason must be at least {MIN_CANCEL_REASON_LEN} characters"
            )));
        }

        let booking = self.load(booking_id).await?;
        if !party_to(&booking, caller) {
            return Err(BookingError::Authorization(
                "Only the trainer or trainee of this booking can cancel it".to_string(),
            ));
        }

        match self
            .store
            .cancel_booking(booking_id, reason, caller.role, Utc::now())
            .await
            .map_err(BookingError::Database)?
        {
            Some(canceled) => {
                info!(booking_id = %booking_id, canceled_by = %caller.role, "booking canceled");
                Ok(canceled)
            }
            None => Err(self.rejected_transition(booking_id, "cancel").await),
        }
    }

    /// Marks a confirmed booking as completed, storing optional feedback.
    ///
    /// # Errors
    ///
    /// * `BookingError::Authorization` - caller is not this booking's trainer
    /// * `BookingError::NotFound` - unknown booking
    /// * `BookingError::Validation` - feedback too long
    /// * `BookingError::State` - booking is not `confirmed`
    pub async fn complete_booking(
        &self,
        caller: Caller,
        booking_id: Uuid,
        feedback: Option<String>,
    ) -> BookingResult<Booking> {
        if !caller.is_trainer() {
            return Err(BookingError::Authorization(
                "Only the trainer can mark a session completed".to_string(),
            ));
        }

        let booking = self.load(booking_id).await?;
        if booking.trainer_id != caller.user_id {
            return Err(BookingError::Authorization(
                "Only the trainer of this booking can complete it".to_string(),
            ));
        }

        let feedback = normalize_notes(feedback)?;
        match self
            .store
            .complete_booking(booking_id, feedback, Utc::now())
            .await
            .map_err(BookingError::Database)?
        {
            Some(completed) => {
                info!(booking_id = %booking_id, "booking completed");
                Ok(completed)
            }
            None => Err(self.rejected_transition(booking_id, "complete").await),
        }
    }

    /// Bookings of one party, ordered by slot start.
    pub async fn list_bookings(
        &self,
        party: Party,
        status: Option<BookingStatus>,
    ) -> BookingResult<Vec<BookingDetails>> {
        let viewer = match party {
            Party::Trainer(_) => Role::Trainer,
            Party::Trainee(_) => Role::Trainee,
        };

        let booked = self
            .store
            .list_bookings(party, status)
            .await
            .map_err(BookingError::Database)?;

        Ok(booked
            .into_iter()
            .map(|entry| BookingDetails::for_viewer(entry, viewer))
            .collect())
    }

    pub async fn get_booking(&self, caller: Caller, booking_id: Uuid) -> BookingResult<BookingDetails> {
        let booking = self.load(booking_id).await?;
        if !party_to(&booking, caller) {
            return Err(BookingError::Authorization(
                "This booking belongs to someone else".to_string(),
            ));
        }

        let slot = self
            .store
            .get_slot(booking.slot_id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Slot with ID {} not found", booking.slot_id))
            })?;

        Ok(BookingDetails::for_viewer(BookedSlot { booking, slot }, caller.role))
    }

    async fn load(&self, booking_id: Uuid) -> BookingResult<Booking> {
        self.store
            .get_booking(booking_id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| BookingError::NotFound(format!("Booking with ID {} not found", booking_id)))
    }

    /// Explains why a conditional transition matched no row.
    async fn rejected_transition(&self, booking_id: Uuid, action: &str) -> BookingError {
        let current = match self.load(booking_id).await {
            Ok(booking) => booking,
            Err(err) => return err,
        };
        warn!(booking_id = %booking_id, status = %current.status, action, "booking transition rejected");
        BookingError::booking_state(format!(
            "Cannot {action} a booking that is already {}",
            current.status
        ))
    }
}

fn party_to(booking: &Booking, caller: Caller) -> bool {
    match caller.role {
        Role::Trainer => booking.trainer_id == caller.user_id,
        Role::Trainee => booking.trainee_id == caller.user_id,
    }
}

fn normalize_notes(notes: Option<String>) -> BookingResult<Option<String>> {
    let notes = notes
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    if let Some(text) = &notes {
        if text.chars().count() > MAX_NOTES_LEN {
            return Err(BookingError::Validation(format!(
                "Notes must be at most {MAX_NOTES_LEN} characters"
            )));
        }
    }

    Ok(notes)
}
