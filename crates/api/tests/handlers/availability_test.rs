use std::collections::BTreeMap;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;
use trainbook_core::models::{
    availability::AvailabilityWithSlots,
    identity::Role,
    slot::{Slot, SlotStatus},
};
use uuid::Uuid;

use crate::test_utils::{availability_body, next_week, ActingAs, TestContext};

#[tokio::test]
async fn test_create_availability_returns_generated_slots() {
    let ctx = TestContext::new();

    let created = ctx.morning().await;

    assert_eq!(created.availability.trainer_id, ctx.trainer);
    assert_eq!(created.availability.date, next_week());
    let ranges: Vec<_> = created
        .slots
        .iter()
        .map(|slot| (slot.start_time.to_string(), slot.end_time.to_string()))
        .collect();
    assert_eq!(
        ranges,
        vec![
            ("09:00:00".to_string(), "09:30:00".to_string()),
            ("09:30:00".to_string(), "10:00:00".to_string()),
        ]
    );
    assert!(created.slots.iter().all(|slot| slot.status == SlotStatus::Available));
}

#[tokio::test]
async fn test_trainee_cannot_create_availability() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/availability")
        .acting_as(Uuid::new_v4(), Role::Trainee)
        .json(&availability_body("09:00:00", "10:00:00", 30))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["kind"], "authorization");
}

#[rstest]
#[case("10:00:00", "09:00:00", 30)]
#[case("09:00:00", "10:00:00", 10)]
#[case("09:00:00", "10:00:00", 90)]
#[case("09:00:00", "09:20:00", 30)]
#[tokio::test]
async fn test_invalid_window_is_rejected(
    #[case] start: &str,
    #[case] end: &str,
    #[case] duration: i32,
) {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/availability")
        .acting_as(ctx.trainer, Role::Trainer)
        .json(&availability_body(start, end, duration))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "validation");
}

#[tokio::test]
async fn test_overlapping_window_conflicts() {
    let ctx = TestContext::new();
    ctx.morning().await;

    let response = ctx
        .server
        .post("/api/availability")
        .acting_as(ctx.trainer, Role::Trainer)
        .json(&availability_body("09:45:00", "11:00:00", 15))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["kind"], "overlap");

    // Back-to-back windows are fine
    let response = ctx
        .server
        .post("/api/availability")
        .acting_as(ctx.trainer, Role::Trainer)
        .json(&availability_body("10:00:00", "11:00:00", 60))
        .await;
    response.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_list_availabilities_groups_by_date() {
    let ctx = TestContext::new();
    ctx.morning().await;

    // A trainee looks up the trainer's calendar
    let response = ctx
        .server
        .get("/api/availability")
        .add_query_param("trainerId", ctx.trainer)
        .acting_as(Uuid::new_v4(), Role::Trainee)
        .await;
    response.assert_status_ok();

    let by_date: BTreeMap<String, Vec<Slot>> = response.json();
    assert_eq!(by_date.len(), 1);
    assert_eq!(by_date[&next_week().to_string()].len(), 2);

    // Without a trainerId the caller's own calendar is listed
    let own: BTreeMap<String, Vec<Slot>> = ctx
        .server
        .get("/api/availability")
        .acting_as(ctx.trainer, Role::Trainer)
        .await
        .json();
    assert_eq!(own, by_date);
}

#[tokio::test]
async fn test_get_availability_by_id() {
    let ctx = TestContext::new();
    let created = ctx.morning().await;

    let response = ctx
        .server
        .get(&format!("/api/availability/{}", created.availability.id))
        .acting_as(ctx.trainer, Role::Trainer)
        .await;
    response.assert_status_ok();
    let fetched: AvailabilityWithSlots = response.json();
    assert_eq!(fetched.availability.id, created.availability.id);
    assert_eq!(fetched.slots.len(), 2);

    let response = ctx
        .server
        .get(&format!("/api/availability/{}", Uuid::new_v4()))
        .acting_as(ctx.trainer, Role::Trainer)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}
