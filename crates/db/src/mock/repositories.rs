use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mockall::mock;
use trainbook_core::{
    models::{
        availability::Availability,
        booking::{BookedSlot, Booking, BookingStatus},
        identity::{Party, Role},
        slot::Slot,
    },
    store::{AvailabilityInsert, AvailabilityStore, BookingStore, SlotStore},
};
use uuid::Uuid;

// Mock store for exercising callers without a database
mock! {
    pub Store {}

    #[async_trait]
    impl AvailabilityStore for Store {
        async fn insert_availability(
            &self,
            availability: &Availability,
            slots: &[Slot],
        ) -> eyre::Result<AvailabilityInsert>;

        async fn get_availability(&self, id: Uuid) -> eyre::Result<Option<Availability>>;

        async fn list_upcoming_slots(
            &self,
            trainer_id: Uuid,
            from: NaiveDate,
        ) -> eyre::Result<Vec<Slot>>;
    }

    #[async_trait]
    impl SlotStore for Store {
        async fn get_slot(&self, id: Uuid) -> eyre::Result<Option<Slot>>;

        async fn list_slots_by_date(
            &self,
            trainer_id: Uuid,
            date: NaiveDate,
        ) -> eyre::Result<Vec<Slot>>;

        async fn list_slots_by_availability(
            &self,
            availability_id: Uuid,
        ) -> eyre::Result<Vec<Slot>>;

        async fn cancel_slot(&self, id: Uuid) -> eyre::Result<Option<Slot>>;

        async fn claim_slot(&self, slot_id: Uuid, booking: &Booking) -> eyre::Result<Option<Slot>>;
    }

    #[async_trait]
    impl BookingStore for Store {
        async fn get_booking(&self, id: Uuid) -> eyre::Result<Option<Booking>>;

        async fn list_bookings(
            &self,
            party: Party,
            status: Option<BookingStatus>,
        ) -> eyre::Result<Vec<BookedSlot>>;

        async fn cancel_booking(
            &self,
            id: Uuid,
            reason: &str,
            canceled_by: Role,
            now: DateTime<Utc>,
        ) -> eyre::Result<Option<Booking>>;

        async fn complete_booking(
            &self,
            id: Uuid,
            notes: Option<String>,
            now: DateTime<Utc>,
        ) -> eyre::Result<Option<Booking>>;
    }
}
