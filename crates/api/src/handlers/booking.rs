use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use trainbook_core::models::{
    booking::{
        Booking, BookingDetails, BookingStatus, CancelBookingRequest, CompleteBookingRequest,
    },
    identity::Party,
};
use uuid::Uuid;

use crate::{
    middleware::{auth::CurrentCaller, error_handling::AppError},
    ApiState,
};

#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    pub status: Option<BookingStatus>,
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .services
        .bookings
        .cancel_booking(caller, id, &payload.reason)
        .await?;

    Ok(Json(booking))
}

/// Marks a session as held. Feedback is optional and so is the body.
#[axum::debug_handler]
pub async fn complete_booking(
    State(state): State<Arc<ApiState>>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<Uuid>,
    payload: Option<Json<CompleteBookingRequest>>,
) -> Result<Json<Booking>, AppError> {
    let Json(payload) = payload.unwrap_or_default();
    let booking = state
        .services
        .bookings
        .complete_booking(caller, id, payload.feedback)
        .await?;

    Ok(Json(booking))
}

/// The caller's bookings, from whichever side of them the caller is on.
#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<ApiState>>,
    CurrentCaller(caller): CurrentCaller,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingDetails>>, AppError> {
    let bookings = state
        .services
        .bookings
        .list_bookings(Party::from(caller), query.status)
        .await?;

    Ok(Json(bookings))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingDetails>, AppError> {
    let booking = state.services.bookings.get_booking(caller, id).await?;
    Ok(Json(booking))
}
