//! # Trainbook API
//!
//! HTTP surface of the Trainbook booking service: trainers publish
//! availability, trainees book the generated slots, and both sides move
//! bookings through their lifecycle.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Unpack requests, call the booking components, shape responses
//! - **Middleware**: Caller identity extraction and error mapping
//! - **Config**: Environment configuration
//!
//! The API uses Axum as the web framework. All state lives behind the
//! `trainbook_core::store::Store` traits, backed by PostgreSQL in production.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Caller identity and error mapping
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    BoxError, Json, Router,
};
use eyre::Result;
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use trainbook_core::{services::Services, store::Store};
use trainbook_db::{DbPool, PgStore};

use middleware::auth::{USER_ID_HEADER, USER_ROLE_HEADER};

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use trainbook_api::{router, ApiState};
/// use trainbook_core::store::memory::InMemoryStore;
///
/// let state = Arc::new(ApiState::new(Arc::new(InMemoryStore::new())));
/// let app = router(state);
/// ```
#[derive(Clone)]
pub struct ApiState {
    /// The booking components, all sharing one store
    pub services: Services,
}

impl ApiState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            services: Services::new(store),
        }
    }
}

/// Builds the application router with all routes attached.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Availability management endpoints
        .merge(routes::availability::routes())
        // Slot listing, removal and booking endpoints
        .merge(routes::slot::routes())
        // Booking lifecycle endpoints
        .merge(routes::booking::routes())
        // Attach shared state to all routes
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Starts the API server with the provided configuration and database connection
///
/// Initializes logging, wires the booking components to PostgreSQL, applies
/// CORS and timeout layers, and serves until the listener fails.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// use trainbook_api::{config::ApiConfig, start_server};
///
/// let config = ApiConfig::from_env()?;
/// let db_pool = trainbook_db::create_pool(&config.database_url, config.database_max_connections).await?;
/// start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let store: Arc<dyn Store> = Arc::new(PgStore::new(db_pool));
    let state = Arc::new(ApiState::new(store));
    let app = router(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout_error))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(USER_ROLE_HEADER),
        ])
        .allow_origin(origins))
}

async fn handle_timeout_error(err: BoxError) -> (StatusCode, Json<serde_json::Value>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Request timed out", "kind": "timeout" })),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error", "kind": "internal" })),
        )
    }
}
