use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;
use trainbook_api::{router, ApiState};
use trainbook_core::{
    models::{availability::AvailabilityWithSlots, booking::Booking, identity::Role},
    store::{memory::InMemoryStore, Store},
};
use uuid::Uuid;

pub struct TestContext {
    pub server: TestServer,
    pub trainer: Uuid,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn Store>) -> Self {
        let state = Arc::new(ApiState::new(store));
        let server = TestServer::new(router(state)).expect("Failed to start test server");
        Self {
            server,
            trainer: Uuid::new_v4(),
        }
    }

    /// Declares 09:00-10:00 in half-hour slots a week from today.
    pub async fn morning(&self) -> AvailabilityWithSlots {
        let response = self
            .server
            .post("/api/availability")
            .acting_as(self.trainer, Role::Trainer)
            .json(&availability_body("09:00:00", "10:00:00", 30))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    pub async fn book(&self, slot_id: Uuid, trainee: Uuid) -> Booking {
        let response = self
            .server
            .post(&format!("/api/slots/{slot_id}/book"))
            .acting_as(trainee, Role::Trainee)
            .json(&json!({}))
            .await;
        response.assert_status_ok();
        response.json()
    }
}

/// Attaches the identity headers the gateway would forward.
pub trait ActingAs {
    fn acting_as(self, user_id: Uuid, role: Role) -> Self;
}

impl ActingAs for TestRequest {
    fn acting_as(self, user_id: Uuid, role: Role) -> Self {
        self.add_header(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_str(&user_id.to_string()).unwrap(),
        )
        .add_header(
            HeaderName::from_static("x-user-role"),
            HeaderValue::from_static(role.as_str()),
        )
    }
}

pub fn next_week() -> NaiveDate {
    Utc::now().date_naive() + Duration::days(7)
}

pub fn availability_body(start: &str, end: &str, duration: i32) -> serde_json::Value {
    json!({
        "date": next_week().to_string(),
        "startTime": start,
        "endTime": end,
        "slotDurationMinutes": duration,
    })
}
