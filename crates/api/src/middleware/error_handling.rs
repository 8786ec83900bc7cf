//! # Error Handling Middleware
//!
//! Maps `BookingError` to HTTP status codes and a JSON body of the form
//! `{"error": "<message>", "kind": "<snake_case kind>"}`.
//!
//! Illegal transitions split by subject: a slot in the wrong state is a bad
//! request (400), a booking in the wrong state is a conflict with a concurrent
//! or earlier transition (409).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use trainbook_core::errors::{BookingError, StateSubject};

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use trainbook_api::middleware::error_handling::AppError;
/// use trainbook_core::errors::BookingError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(BookingError::NotFound("Slot missing".to_string())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Overlap(_) => StatusCode::CONFLICT,
            BookingError::Conflict(_) => StatusCode::CONFLICT,
            BookingError::SlotUnavailable(_) => StatusCode::CONFLICT,
            BookingError::State {
                subject: StateSubject::Slot,
                ..
            } => StatusCode::BAD_REQUEST,
            BookingError::State {
                subject: StateSubject::Booking,
                ..
            } => StatusCode::CONFLICT,
            BookingError::Authentication(_) => StatusCode::UNAUTHORIZED,
            BookingError::Authorization(_) => StatusCode::FORBIDDEN,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Infrastructure details stay in the logs
        let message = if status.is_server_error() {
            error!(error = %self.0, kind = self.0.kind(), "request failed");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };

        let body = Json(json!({ "error": message, "kind": self.0.kind() }));
        (status, body).into_response()
    }
}

/// Allows `?` on `BookingResult` inside handlers.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}

/// Maps a BookingError straight to an HTTP response.
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
