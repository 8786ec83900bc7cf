use std::{collections::BTreeMap, sync::Arc};

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    allocation,
    errors::{BookingError, BookingResult},
    models::{
        availability::{Availability, AvailabilityWithSlots, CreateAvailabilityRequest},
        identity::Caller,
        slot::Slot,
    },
    services::SlotAllocator,
    store::{AvailabilityInsert, Store},
};

/// Validates and stores trainer availability windows.
#[derive(Clone)]
pub struct AvailabilityManager {
    store: Arc<dyn Store>,
}

impl AvailabilityManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Declares a new window for `trainer_id` and generates its slots.
    ///
    /// The overlap check and both inserts commit together, so two concurrent
    /// overlapping declarations cannot both succeed.
    ///
    /// # Errors
    ///
    /// * `BookingError::Authorization` - caller is not that trainer
    /// * `BookingError::Validation` - malformed window or duration
    /// * `BookingError::Overlap` - an existing window on that date intersects
    pub async fn create_availability(
        &self,
        caller: Caller,
        trainer_id: Uuid,
        request: CreateAvailabilityRequest,
    ) -> BookingResult<AvailabilityWithSlots> {
        if !caller.is_trainer() || caller.user_id != trainer_id {
            return Err(BookingError::Authorization(
                "Only the trainer can declare their own availability".to_string(),
            ));
        }

        let now = Utc::now();
        allocation::validate_window(
            request.date,
            request.start_time,
            request.end_time,
            request.slot_duration_minutes,
            now.date_naive(),
        )?;

        let availability = Availability {
            id: Uuid::new_v4(),
            trainer_id,
            date: request.date,
            start_time: request.start_time,
            end_time: request.end_time,
            slot_duration_minutes: request.slot_duration_minutes,
            created_at: now,
        };
        let slots = SlotAllocator::generate_slots(&availability);

        match self
            .store
            .insert_availability(&availability, &slots)
            .await
            .map_err(BookingError::Database)?
        {
            AvailabilityInsert::Inserted => {
                info!(
                    availability_id = %availability.id,
                    trainer_id = %trainer_id,
                    date = %availability.date,
                    slots = slots.len(),
                    "availability created"
                );
                Ok(AvailabilityWithSlots { availability, slots })
            }
            AvailabilityInsert::Overlapping(existing) => Err(BookingError::Overlap(format!(
                "Window {}-{} on {} overlaps your existing availability {}-{}",
                availability.start_time,
                availability.end_time,
                availability.date,
                existing.start_time,
                existing.end_time
            ))),
        }
    }

    /// Upcoming slots for a trainer, grouped by date and sorted by start time.
    pub async fn list_availabilities(
        &self,
        trainer_id: Uuid,
    ) -> BookingResult<BTreeMap<NaiveDate, Vec<Slot>>> {
        let today = Utc::now().date_naive();
        let slots = self
            .store
            .list_upcoming_slots(trainer_id, today)
            .await
            .map_err(BookingError::Database)?;

        let mut by_date: BTreeMap<NaiveDate, Vec<Slot>> = BTreeMap::new();
        for slot in slots {
            by_date.entry(slot.date).or_default().push(slot);
        }
        for day in by_date.values_mut() {
            day.sort_by_key(|slot| slot.start_time);
        }

        debug!(trainer_id = %trainer_id, days = by_date.len(), "listed availabilities");
        Ok(by_date)
    }

    pub async fn get_availability(&self, id: Uuid) -> BookingResult<AvailabilityWithSlots> {
        let availability = self
            .store
            .get_availability(id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| BookingError::NotFound(format!("Availability with ID {} not found", id)))?;

        let slots = self
            .store
            .list_slots_by_availability(id)
            .await
            .map_err(BookingError::Database)?;

        Ok(AvailabilityWithSlots { availability, slots })
    }
}
