use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use trainbook_core::models::{
    booking::{BookSlotRequest, Booking},
    slot::Slot,
};
use uuid::Uuid;

use crate::{
    middleware::{auth::CurrentCaller, error_handling::AppError},
    ApiState,
};

#[derive(Debug, Deserialize)]
pub struct SlotsByDateQuery {
    pub date: NaiveDate,
}

/// All slots of one trainer on one date, in start order and in every status.
#[axum::debug_handler]
pub async fn list_slots_by_date(
    State(state): State<Arc<ApiState>>,
    CurrentCaller(_caller): CurrentCaller,
    Path(trainer_id): Path<Uuid>,
    Query(query): Query<SlotsByDateQuery>,
) -> Result<Json<Vec<Slot>>, AppError> {
    let slots = state
        .services
        .slots
        .get_slots_by_date(trainer_id, query.date)
        .await?;

    Ok(Json(slots))
}

/// Withdraws one of the caller's own unbooked slots.
#[axum::debug_handler]
pub async fn cancel_slot(
    State(state): State<Arc<ApiState>>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<Uuid>,
) -> Result<Json<Slot>, AppError> {
    let slot = state.services.slots.cancel_slot(caller, id).await?;
    Ok(Json(slot))
}

/// Books a slot. The body is optional; a trainee booking for themselves
/// needs none. Losing a race for the slot answers 409 with a message telling
/// the client to pick another one.
#[axum::debug_handler]
pub async fn book_slot(
    State(state): State<Arc<ApiState>>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<Uuid>,
    payload: Option<Json<BookSlotRequest>>,
) -> Result<Json<Booking>, AppError> {
    let Json(payload) = payload.unwrap_or_default();
    let booking = state.services.bookings.book_slot(caller, id, payload).await?;
    Ok(Json(booking))
}
