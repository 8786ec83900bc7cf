use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/trainers/:trainer_id/slots",
            get(handlers::slot::list_slots_by_date),
        )
        .route("/api/slots/:id/cancel", post(handlers::slot::cancel_slot))
        .route("/api/slots/:id/book", post(handlers::slot::book_slot))
}
