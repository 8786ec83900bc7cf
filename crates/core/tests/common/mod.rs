#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use trainbook_core::{
    models::{
        availability::{AvailabilityWithSlots, CreateAvailabilityRequest},
        identity::Caller,
    },
    services::Services,
    store::{Store, memory::InMemoryStore},
};
use uuid::Uuid;

pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub services: Services,
    pub trainer: Caller,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let services = Services::new(store.clone() as Arc<dyn Store>);
        Self {
            store,
            services,
            trainer: Caller::trainer(Uuid::new_v4()),
        }
    }

    /// One 09:00-10:00 window in half-hour slots, a week from today.
    pub async fn morning(&self) -> AvailabilityWithSlots {
        self.window(hm(9, 0), hm(10, 0), 30).await
    }

    pub async fn window(&self, start: NaiveTime, end: NaiveTime, duration: i32) -> AvailabilityWithSlots {
        self.services
            .availability
            .create_availability(
                self.trainer,
                self.trainer.user_id,
                CreateAvailabilityRequest {
                    date: next_week(),
                    start_time: start,
                    end_time: end,
                    slot_duration_minutes: duration,
                },
            )
            .await
            .expect("Failed to create availability")
    }

    /// A slot belonging to a freshly created, different trainer.
    pub async fn slot_of_other_trainer(&self) -> Uuid {
        let other = Caller::trainer(Uuid::new_v4());
        let created = self
            .services
            .availability
            .create_availability(
                other,
                other.user_id,
                CreateAvailabilityRequest {
                    date: next_week(),
                    start_time: hm(9, 0),
                    end_time: hm(10, 0),
                    slot_duration_minutes: 60,
                },
            )
            .await
            .expect("Failed to create availability");
        created.slots[0].id
    }
}

pub fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub fn next_week() -> NaiveDate {
    Utc::now().date_naive() + Duration::days(7)
}
