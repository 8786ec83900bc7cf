//! # Availability Handlers
//!
//! Trainers declare windows of free time; each window is carved into
//! fixed-duration slots at creation time. Listing returns upcoming slots
//! grouped by date.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::{collections::BTreeMap, sync::Arc};
use trainbook_core::models::{
    availability::{AvailabilityWithSlots, CreateAvailabilityRequest},
    slot::Slot,
};
use uuid::Uuid;

use crate::{
    middleware::{auth::CurrentCaller, error_handling::AppError},
    ApiState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAvailabilityQuery {
    /// Whose slots to list. Defaults to the caller.
    pub trainer_id: Option<Uuid>,
}

/// Declares a window for the calling trainer and returns it with its slots.
///
/// # Endpoint
///
/// ```text
/// POST /api/availability
/// {"date": "2030-05-01", "startTime": "09:00:00", "endTime": "10:00:00", "slotDurationMinutes": 30}
/// ```
///
/// # Errors
///
/// * `BookingError::Authorization` - caller is not a trainer
/// * `BookingError::Validation` - malformed window or duration
/// * `BookingError::Overlap` - intersects an existing window on that date
#[axum::debug_handler]
pub async fn create_availability(
    State(state): State<Arc<ApiState>>,
    CurrentCaller(caller): CurrentCaller,
    Json(payload): Json<CreateAvailabilityRequest>,
) -> Result<(StatusCode, Json<AvailabilityWithSlots>), AppError> {
    let created = state
        .services
        .availability
        .create_availability(caller, caller.user_id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn list_availabilities(
    State(state): State<Arc<ApiState>>,
    CurrentCaller(caller): CurrentCaller,
    Query(query): Query<ListAvailabilityQuery>,
) -> Result<Json<BTreeMap<NaiveDate, Vec<Slot>>>, AppError> {
    let trainer_id = query.trainer_id.unwrap_or(caller.user_id);
    let by_date = state
        .services
        .availability
        .list_availabilities(trainer_id)
        .await?;

    Ok(Json(by_date))
}

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    CurrentCaller(_caller): CurrentCaller,
    Path(id): Path<Uuid>,
) -> Result<Json<AvailabilityWithSlots>, AppError> {
    let availability = state.services.availability.get_availability(id).await?;
    Ok(Json(availability))
}
