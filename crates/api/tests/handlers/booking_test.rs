use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use trainbook_core::models::{
    booking::{Booking, BookingDetails, BookingStatus},
    identity::Role,
};
use uuid::Uuid;

use crate::test_utils::{ActingAs, TestContext};

#[tokio::test]
async fn test_cancel_booking_releases_slot_for_rebooking() {
    let ctx = TestContext::new();
    let slot = ctx.morning().await.slots[0].clone();
    let trainee = Uuid::new_v4();
    let booking = ctx.book(slot.id, trainee).await;

    let response = ctx
        .server
        .post(&format!("/api/bookings/{}/cancel", booking.id))
        .acting_as(ctx.trainer, Role::Trainer)
        .json(&json!({ "reason": "schedule conflict" }))
        .await;
    response.assert_status_ok();

    let canceled: Booking = response.json();
    assert_eq!(canceled.status, BookingStatus::Canceled);
    assert_eq!(canceled.cancel_reason.as_deref(), Some("schedule conflict"));
    assert_eq!(canceled.canceled_by, Some(Role::Trainer));

    let rebooked = ctx.book(slot.id, Uuid::new_v4()).await;
    assert_eq!(rebooked.status, BookingStatus::Confirmed);
    assert_eq!(rebooked.slot_id, slot.id);
}

#[tokio::test]
async fn test_second_cancel_is_a_state_conflict() {
    let ctx = TestContext::new();
    let slot = ctx.morning().await.slots[0].clone();
    let trainee = Uuid::new_v4();
    let booking = ctx.book(slot.id, trainee).await;
    let path = format!("/api/bookings/{}/cancel", booking.id);

    ctx.server
        .post(&path)
        .acting_as(trainee, Role::Trainee)
        .json(&json!({ "reason": "feeling unwell today" }))
        .await
        .assert_status_ok();

    let response = ctx
        .server
        .post(&path)
        .acting_as(trainee, Role::Trainee)
        .json(&json!({ "reason": "feeling unwell today" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["kind"], "state");
}

#[tokio::test]
async fn test_cancel_requires_meaningful_reason() {
    let ctx = TestContext::new();
    let slot = ctx.morning().await.slots[0].clone();
    let trainee = Uuid::new_v4();
    let booking = ctx.book(slot.id, trainee).await;

    for reason in ["", "   ", "too short"] {
        let response = ctx
            .server
            .post(&format!("/api/bookings/{}/cancel", booking.id))
            .acting_as(trainee, Role::Trainee)
            .json(&json!({ "reason": reason }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_outsider_cannot_cancel_booking() {
    let ctx = TestContext::new();
    let slot = ctx.morning().await.slots[0].clone();
    let booking = ctx.book(slot.id, Uuid::new_v4()).await;

    let response = ctx
        .server
        .post(&format!("/api/bookings/{}/cancel", booking.id))
        .acting_as(Uuid::new_v4(), Role::Trainee)
        .json(&json!({ "reason": "not my booking at all" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_trainer_completes_booking_with_feedback() {
    let ctx = TestContext::new();
    let slot = ctx.morning().await.slots[0].clone();
    let trainee = Uuid::new_v4();
    let booking = ctx.book(slot.id, trainee).await;
    let path = format!("/api/bookings/{}/complete", booking.id);

    // Trainees cannot close a session
    ctx.server
        .post(&path)
        .acting_as(trainee, Role::Trainee)
        .json(&json!({}))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = ctx
        .server
        .post(&path)
        .acting_as(ctx.trainer, Role::Trainer)
        .json(&json!({ "feedback": "Solid progress on mobility" }))
        .await;
    response.assert_status_ok();
    let completed: Booking = response.json();
    assert_eq!(completed.status, BookingStatus::Completed);
    assert_eq!(completed.notes.as_deref(), Some("Solid progress on mobility"));

    // Completed is terminal
    let response = ctx
        .server
        .post(&format!("/api/bookings/{}/cancel", booking.id))
        .acting_as(trainee, Role::Trainee)
        .json(&json!({ "reason": "changed my mind later" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_trainer_completes_booking_without_a_body() {
    let ctx = TestContext::new();
    let slot = ctx.morning().await.slots[0].clone();
    let booking = ctx.book(slot.id, Uuid::new_v4()).await;

    let response = ctx
        .server
        .post(&format!("/api/bookings/{}/complete", booking.id))
        .acting_as(ctx.trainer, Role::Trainer)
        .await;
    response.assert_status_ok();

    let completed: Booking = response.json();
    assert_eq!(completed.status, BookingStatus::Completed);
    assert_eq!(completed.notes, None);
}

#[tokio::test]
async fn test_list_bookings_per_party_and_status() {
    let ctx = TestContext::new();
    let slots = ctx.morning().await.slots;
    let trainee = Uuid::new_v4();
    let first = ctx.book(slots[0].id, trainee).await;
    let second = ctx.book(slots[1].id, trainee).await;

    ctx.server
        .post(&format!("/api/bookings/{}/cancel", first.id))
        .acting_as(trainee, Role::Trainee)
        .json(&json!({ "reason": "double booked myself" }))
        .await
        .assert_status_ok();

    let mine: Vec<BookingDetails> = ctx
        .server
        .get("/api/bookings")
        .acting_as(trainee, Role::Trainee)
        .await
        .json();
    let ids: Vec<_> = mine.iter().map(|details| details.booking.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert!(mine.iter().all(|details| details.counterpart.id == ctx.trainer));
    assert_eq!(mine[1].start_time, slots[1].start_time);

    let confirmed: Vec<BookingDetails> = ctx
        .server
        .get("/api/bookings")
        .add_query_param("status", "confirmed")
        .acting_as(ctx.trainer, Role::Trainer)
        .await
        .json();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0].booking.id, second.id);
    assert_eq!(confirmed[0].counterpart.id, trainee);
    assert_eq!(confirmed[0].counterpart.role, Role::Trainee);

    let response = ctx
        .server
        .get("/api/bookings")
        .add_query_param("status", "pending")
        .acting_as(trainee, Role::Trainee)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_booking_is_limited_to_its_parties() {
    let ctx = TestContext::new();
    let slot = ctx.morning().await.slots[0].clone();
    let trainee = Uuid::new_v4();
    let booking = ctx.book(slot.id, trainee).await;
    let path = format!("/api/bookings/{}", booking.id);

    let response = ctx.server.get(&path).acting_as(trainee, Role::Trainee).await;
    response.assert_status_ok();
    let details: BookingDetails = response.json();
    assert_eq!(details.booking.id, booking.id);
    assert_eq!(details.date, slot.date);

    ctx.server
        .get(&path)
        .acting_as(Uuid::new_v4(), Role::Trainer)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    ctx.server
        .get(&format!("/api/bookings/{}", Uuid::new_v4()))
        .acting_as(trainee, Role::Trainee)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
