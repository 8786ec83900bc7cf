use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use eyre::eyre;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;
use trainbook_api::{
    config::{parse_cors_origins, parse_log_level},
    middleware::error_handling::{map_error, AppError},
};
use trainbook_core::{errors::BookingError, models::identity::Role};
use trainbook_db::mock::MockStore;
use tracing::Level;
use uuid::Uuid;

use crate::test_utils::{ActingAs, TestContext};

#[rstest]
#[case(BookingError::NotFound("gone".into()), StatusCode::NOT_FOUND)]
#[case(BookingError::Validation("bad".into()), StatusCode::BAD_REQUEST)]
#[case(BookingError::Overlap("clash".into()), StatusCode::CONFLICT)]
#[case(BookingError::Conflict("busy".into()), StatusCode::CONFLICT)]
#[case(BookingError::SlotUnavailable("taken".into()), StatusCode::CONFLICT)]
#[case(BookingError::slot_state("already canceled"), StatusCode::BAD_REQUEST)]
#[case(BookingError::booking_state("already completed"), StatusCode::CONFLICT)]
#[case(BookingError::Authentication("who".into()), StatusCode::UNAUTHORIZED)]
#[case(BookingError::Authorization("nope".into()), StatusCode::FORBIDDEN)]
#[case(BookingError::Database(eyre!("down")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: BookingError, #[case] expected: StatusCode) {
    assert_eq!(AppError(error).status(), expected);
}

#[tokio::test]
async fn test_error_response_carries_kind() {
    let response = map_error(BookingError::SlotUnavailable("taken".into()));
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/bookings").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["kind"], "authentication");
}

#[rstest]
#[case("not-a-uuid", "trainee")]
#[case("5f0c4a8e-8d7b-4a43-9a35-1a6f2f6c9b11", "admin")]
#[tokio::test]
async fn test_malformed_identity_is_unauthorized(#[case] user_id: &str, #[case] role: &str) {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/bookings")
        .add_header(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_str(user_id).unwrap(),
        )
        .add_header(
            HeaderName::from_static("x-user-role"),
            HeaderValue::from_str(role).unwrap(),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_role_header_is_case_insensitive() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/bookings")
        .add_header(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap(),
        )
        .add_header(
            HeaderName::from_static("x-user-role"),
            HeaderValue::from_static("Trainer"),
        )
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_storage_failure_hides_details() {
    let mut store = MockStore::new();
    store
        .expect_list_bookings()
        .returning(|_, _| Err(eyre!("connection refused on 10.0.0.7")));
    let ctx = TestContext::with_store(Arc::new(store));

    let response = ctx
        .server
        .get("/api/bookings")
        .acting_as(Uuid::new_v4(), Role::Trainee)
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["kind"], "database");
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new();

    let health: Value = ctx.server.get("/health").await.json();
    assert_eq!(health["status"], "ok");

    let version: Value = ctx.server.get("/version").await.json();
    assert_eq!(version["service"], "trainbook-api");
}

#[rstest]
#[case("debug", Level::DEBUG)]
#[case(" WARN ", Level::WARN)]
#[case("", Level::INFO)]
#[case("verbose", Level::INFO)]
fn test_log_level_parsing(#[case] value: &str, #[case] expected: Level) {
    assert_eq!(parse_log_level(value), expected);
}

#[test]
fn test_cors_origin_parsing() {
    let origins = parse_cors_origins("https://app.example.com, http://localhost:5173,").unwrap();
    assert_eq!(
        origins,
        vec![
            "https://app.example.com".to_string(),
            "http://localhost:5173".to_string(),
        ]
    );

    assert!(parse_cors_origins("https://ok.example.com,bad\norigin").is_err());
}
