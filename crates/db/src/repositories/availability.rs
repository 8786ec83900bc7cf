use crate::models::{DbAvailability, DbSlot};
use chrono::NaiveDate;
use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::debug;
use trainbook_core::models::{availability::Availability, slot::Slot};
use uuid::Uuid;

/// Inserts the window and all of its slots in one transaction. Returns the
/// existing window instead when one for the same trainer and date overlaps.
///
/// A transaction-scoped advisory lock keyed on trainer and date serializes
/// concurrent inserts, so two overlapping windows cannot both pass the check.
pub async fn create_availability(
    pool: &Pool<Postgres>,
    availability: &Availability,
    slots: &[Slot],
) -> Result<Option<DbAvailability>> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::text || $2::text))")
        .bind(availability.trainer_id)
        .bind(availability.date)
        .execute(&mut *tx)
        .await?;

    let overlapping = sqlx::query_as::<_, DbAvailability>(
        r#"
        SELECT id, trainer_id, date, start_time, end_time, slot_duration_minutes, created_at
        FROM availabilities
        WHERE trainer_id = $1
          AND date = $2
          AND start_time < $4
          AND end_time > $3
        ORDER BY start_time ASC
        LIMIT 1
        "#,
    )
    .bind(availability.trainer_id)
    .bind(availability.date)
    .bind(availability.start_time)
    .bind(availability.end_time)
    .fetch_optional(&mut *tx)
    .await?;

    if let Some(existing) = overlapping {
        tx.rollback().await?;
        return Ok(Some(existing));
    }

    sqlx::query(
        r#"
        INSERT INTO availabilities (id, trainer_id, date, start_time, end_time, slot_duration_minutes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(availability.id)
    .bind(availability.trainer_id)
    .bind(availability.date)
    .bind(availability.start_time)
    .bind(availability.end_time)
    .bind(availability.slot_duration_minutes)
    .bind(availability.created_at)
    .execute(&mut *tx)
    .await?;

    for slot in slots {
        sqlx::query(
            r#"
            INSERT INTO slots (id, availability_id, trainer_id, date, start_time, end_time, status, booking_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(slot.id)
        .bind(slot.availability_id)
        .bind(slot.trainer_id)
        .bind(slot.date)
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(slot.status.as_str())
        .bind(slot.booking_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    debug!(availability_id = %availability.id, slots = slots.len(), "Inserted availability");

    Ok(None)
}

pub async fn get_availability_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAvailability>> {
    let availability = sqlx::query_as::<_, DbAvailability>(
        r#"
        SELECT id, trainer_id, date, start_time, end_time, slot_duration_minutes, created_at
        FROM availabilities
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(availability)
}

pub async fn get_upcoming_slots_by_trainer(
    pool: &Pool<Postgres>,
    trainer_id: Uuid,
    from: NaiveDate,
) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, availability_id, trainer_id, date, start_time, end_time, status, booking_id
        FROM slots
        WHERE trainer_id = $1 AND date >= $2
        ORDER BY date ASC, start_time ASC
        "#,
    )
    .bind(trainer_id)
    .bind(from)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}
