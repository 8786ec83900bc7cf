//! # Slot Allocation
//!
//! Partitioning of an availability window into bookable slots, plus the
//! window validation rules that must hold before any slot is generated.
//!
//! A window `[start, end)` with duration `D` minutes yields
//! `floor((end - start) / D)` contiguous slots, the first starting at `start`.
//! Whatever is left at the end (shorter than `D`) produces no slot.

use chrono::{Duration, NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    models::{
        availability::Availability,
        slot::{Slot, SlotStatus},
    },
};

pub const MIN_SLOT_DURATION_MINUTES: i32 = 15;
pub const MAX_SLOT_DURATION_MINUTES: i32 = 60;

/// Checks a proposed window before it is persisted.
///
/// # Errors
///
/// * `BookingError::Validation` - end not after start, duration outside
///   15..=60 minutes, a date before `today`, or a window too short to hold a
///   single slot
pub fn validate_window(
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    slot_duration_minutes: i32,
    today: NaiveDate,
) -> BookingResult<()> {
    if end_time <= start_time {
        return Err(BookingError::Validation(format!(
            "End time {end_time} must be after start time {start_time}"
        )));
    }

    if !(MIN_SLOT_DURATION_MINUTES..=MAX_SLOT_DURATION_MINUTES).contains(&slot_duration_minutes) {
        return Err(BookingError::Validation(format!(
            "Slot duration must be between {MIN_SLOT_DURATION_MINUTES} and {MAX_SLOT_DURATION_MINUTES} minutes, got {slot_duration_minutes}"
        )));
    }

    if date < today {
        return Err(BookingError::Validation(format!(
            "Cannot declare availability for {date}, which is in the past"
        )));
    }

    if slot_count(start_time, end_time, slot_duration_minutes) == 0 {
        return Err(BookingError::Validation(format!(
            "Window {start_time}-{end_time} is shorter than one {slot_duration_minutes}-minute slot"
        )));
    }

    Ok(())
}

/// Number of whole slots that fit in `[start_time, end_time)`.
pub fn slot_count(start_time: NaiveTime, end_time: NaiveTime, slot_duration_minutes: i32) -> i64 {
    if slot_duration_minutes <= 0 || end_time <= start_time {
        return 0;
    }
    let window = (end_time - start_time).num_minutes();
    window / i64::from(slot_duration_minutes)
}

/// Tiles an availability window into `available` slots, sorted by start time.
pub fn generate_slots(availability: &Availability) -> Vec<Slot> {
    let count = slot_count(
        availability.start_time,
        availability.end_time,
        availability.slot_duration_minutes,
    );
    let step = Duration::minutes(i64::from(availability.slot_duration_minutes));

    let mut slots = Vec::with_capacity(usize::try_from(count).unwrap_or_default());
    let mut start = availability.start_time;
    for _ in 0..count {
        let end = start + step;
        slots.push(Slot {
            id: Uuid::new_v4(),
            availability_id: availability.id,
            trainer_id: availability.trainer_id,
            date: availability.date,
            start_time: start,
            end_time: end,
            status: SlotStatus::Available,
            booking_id: None,
        });
        start = end;
    }

    slots
}
