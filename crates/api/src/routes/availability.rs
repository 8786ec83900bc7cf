use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/availability",
            get(handlers::availability::list_availabilities)
                .post(handlers::availability::create_availability),
        )
        .route(
            "/api/availability/:id",
            get(handlers::availability::get_availability),
        )
}
