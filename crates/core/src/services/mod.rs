pub mod availability;
pub mod guard;
pub mod lifecycle;
pub mod slots;

use std::sync::Arc;

pub use availability::AvailabilityManager;
pub use guard::ConflictGuard;
pub use lifecycle::BookingLifecycle;
pub use slots::SlotAllocator;

use crate::store::Store;

/// The booking components wired to one store.
#[derive(Clone)]
pub struct Services {
    pub availability: AvailabilityManager,
    pub slots: SlotAllocator,
    pub bookings: BookingLifecycle,
}

impl Services {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            availability: AvailabilityManager::new(store.clone()),
            slots: SlotAllocator::new(store.clone()),
            bookings: BookingLifecycle::new(store),
        }
    }
}
