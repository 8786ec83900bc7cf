use crate::models::{DbBookedSlot, DbBooking};
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::debug;
use trainbook_core::models::{
    booking::BookingStatus,
    identity::{Party, Role},
};
use uuid::Uuid;

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, trainer_id, trainee_id, slot_id, status, notes, cancel_reason, canceled_by, created_at, updated_at
        FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

/// Bookings where `party` is the trainer or the trainee, joined with their
/// slots and ordered by slot time.
pub async fn get_bookings_for_party(
    pool: &Pool<Postgres>,
    party: Party,
    status: Option<BookingStatus>,
) -> Result<Vec<DbBookedSlot>> {
    let role = match party {
        Party::Trainer(_) => Role::Trainer,
        Party::Trainee(_) => Role::Trainee,
    };

    let bookings = sqlx::query_as::<_, DbBookedSlot>(
        r#"
        SELECT b.id, b.trainer_id, b.trainee_id, b.slot_id, b.status, b.notes,
               b.cancel_reason, b.canceled_by, b.created_at, b.updated_at,
               s.availability_id, s.date, s.start_time, s.end_time,
               s.status AS slot_status, s.booking_id AS slot_booking_id
        FROM bookings b
        JOIN slots s ON s.id = b.slot_id
        WHERE ((b.trainer_id = $1 AND $2 = 'trainer') OR (b.trainee_id = $1 AND $2 = 'trainee'))
          AND ($3::text IS NULL OR b.status = $3)
        ORDER BY s.date ASC, s.start_time ASC, b.created_at ASC
        "#,
    )
    .bind(party.id())
    .bind(role.as_str())
    .bind(status.map(|status| status.as_str()))
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

/// Cancels a confirmed booking and releases its slot in one transaction.
/// The slot is only touched while it still points at this booking.
pub async fn cancel_booking(
    pool: &Pool<Postgres>,
    id: Uuid,
    reason: &str,
    canceled_by: Role,
    now: DateTime<Utc>,
) -> Result<Option<DbBooking>> {
    let mut tx = pool.begin().await?;

    let canceled = sqlx::query_as::<_, DbBooking>(
        r#"
        UPDATE bookings
        SET status = 'canceled', cancel_reason = $2, canceled_by = $3, updated_at = $4
        WHERE id = $1 AND status = 'confirmed'
        RETURNING id, trainer_id, trainee_id, slot_id, status, notes, cancel_reason, canceled_by, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(reason)
    .bind(canceled_by.as_str())
    .bind(now)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(canceled) = canceled else {
        tx.rollback().await?;
        return Ok(None);
    };

    let released = sqlx::query(
        r#"
        UPDATE slots
        SET status = 'available', booking_id = NULL
        WHERE id = $1 AND booking_id = $2
        "#,
    )
    .bind(canceled.slot_id)
    .bind(canceled.id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    debug!(
        booking_id = %canceled.id,
        slot_released = released.rows_affected() > 0,
        "Canceled booking"
    );

    Ok(Some(canceled))
}

/// Completes a confirmed booking. Existing notes are kept when `notes` is
/// `None`.
pub async fn complete_booking(
    pool: &Pool<Postgres>,
    id: Uuid,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<Option<DbBooking>> {
    let completed = sqlx::query_as::<_, DbBooking>(
        r#"
        UPDATE bookings
        SET status = 'completed', notes = COALESCE($2, notes), updated_at = $3
        WHERE id = $1 AND status = 'confirmed'
        RETURNING id, trainer_id, trainee_id, slot_id, status, notes, cancel_reason, canceled_by, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(notes)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(completed)
}
