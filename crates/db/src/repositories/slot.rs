use crate::models::DbSlot;
use chrono::NaiveDate;
use eyre::Result;
use sqlx::{Pool, Postgres};
use trainbook_core::models::booking::Booking;
use uuid::Uuid;

pub async fn get_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, availability_id, trainer_id, date, start_time, end_time, status, booking_id
        FROM slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

pub async fn get_slots_by_trainer_and_date(
    pool: &Pool<Postgres>,
    trainer_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, availability_id, trainer_id, date, start_time, end_time, status, booking_id
        FROM slots
        WHERE trainer_id = $1 AND date = $2
        ORDER BY start_time ASC
        "#,
    )
    .bind(trainer_id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn get_slots_by_availability_id(
    pool: &Pool<Postgres>,
    availability_id: Uuid,
) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, availability_id, trainer_id, date, start_time, end_time, status, booking_id
        FROM slots
        WHERE availability_id = $1
        ORDER BY date ASC, start_time ASC
        "#,
    )
    .bind(availability_id)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

/// Marks an available slot canceled. `None` when the slot is missing or not
/// available.
pub async fn cancel_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        UPDATE slots
        SET status = 'canceled'
        WHERE id = $1 AND status = 'available'
        RETURNING id, availability_id, trainer_id, date, start_time, end_time, status, booking_id
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

/// Flips an available slot to booked and inserts `booking` in the same
/// transaction. Only one concurrent caller can match the `available`
/// predicate; the rest get `None` and nothing is written for them.
pub async fn claim_slot(
    pool: &Pool<Postgres>,
    slot_id: Uuid,
    booking: &Booking,
) -> Result<Option<DbSlot>> {
    let mut tx = pool.begin().await?;

    let claimed = sqlx::query_as::<_, DbSlot>(
        r#"
        UPDATE slots
        SET status = 'booked', booking_id = $2
        WHERE id = $1 AND status = 'available'
        RETURNING id, availability_id, trainer_id, date, start_time, end_time, status, booking_id
        "#,
    )
    .bind(slot_id)
    .bind(booking.id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(claimed) = claimed else {
        tx.rollback().await?;
        return Ok(None);
    };

    sqlx::query(
        r#"
        INSERT INTO bookings (id, trainer_id, trainee_id, slot_id, status, notes, cancel_reason, canceled_by, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(booking.id)
    .bind(booking.trainer_id)
    .bind(booking.trainee_id)
    .bind(slot_id)
    .bind(booking.status.as_str())
    .bind(booking.notes.as_deref())
    .bind(booking.cancel_reason.as_deref())
    .bind(booking.canceled_by.map(|role| role.as_str()))
    .bind(booking.created_at)
    .bind(booking.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Some(claimed))
}
