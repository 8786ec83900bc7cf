use std::fmt;

use thiserror::Error;

/// The record an illegal state transition was attempted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateSubject {
    Slot,
    Booking,
}

impl fmt::Display for StateSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateSubject::Slot => f.write_str("slot"),
            StateSubject::Booking => f.write_str("booking"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Overlap error: {0}")]
    Overlap(String),

    #[error("Conflict error: {0}")]
    Conflict(String),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("Invalid {subject} state: {message}")]
    State {
        subject: StateSubject,
        message: String,
    },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    pub fn slot_state(message: impl Into<String>) -> Self {
        BookingError::State {
            subject: StateSubject::Slot,
            message: message.into(),
        }
    }

    pub fn booking_state(message: impl Into<String>) -> Self {
        BookingError::State {
            subject: StateSubject::Booking,
            message: message.into(),
        }
    }

    /// Stable snake_case name of the variant, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            BookingError::NotFound(_) => "not_found",
            BookingError::Validation(_) => "validation",
            BookingError::Overlap(_) => "overlap",
            BookingError::Conflict(_) => "conflict",
            BookingError::SlotUnavailable(_) => "slot_unavailable",
            BookingError::State { .. } => "state",
            BookingError::Authentication(_) => "authentication",
            BookingError::Authorization(_) => "authorization",
            BookingError::Database(_) => "database",
            BookingError::Internal(_) => "internal",
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
