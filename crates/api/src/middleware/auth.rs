//! # Caller Identity
//!
//! Authentication happens upstream. The gateway forwards the authenticated
//! user as two headers, which this extractor turns into a [`Caller`]:
//!
//! - `X-User-Id`: the user's UUID
//! - `X-User-Role`: `trainer` or `trainee`
//!
//! A missing or malformed header rejects the request with 401.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use trainbook_core::{
    errors::BookingError,
    models::identity::{Caller, Role},
};
use uuid::Uuid;

use super::error_handling::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Extractor for the authenticated caller of a request.
#[derive(Debug, Clone, Copy)]
pub struct CurrentCaller(pub Caller);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentCaller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER)?
            .parse::<Uuid>()
            .map_err(|_| authentication("X-User-Id must be a UUID"))?;
        let role = header(parts, USER_ROLE_HEADER)?
            .parse::<Role>()
            .map_err(|_| authentication("X-User-Role must be 'trainer' or 'trainee'"))?;

        Ok(CurrentCaller(Caller { user_id, role }))
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, AppError> {
    let value = parts
        .headers
        .get(name)
        .ok_or_else(|| authentication(&format!("Missing {name} header")))?;

    value
        .to_str()
        .map(str::trim)
        .map_err(|_| authentication(&format!("Malformed {name} header")))
}

fn authentication(message: &str) -> AppError {
    AppError(BookingError::Authentication(message.to_string()))
}
