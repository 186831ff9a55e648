//! API Routes
//!
//! Configures the Axum router with all portal endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    approve_volunteer_handler, get_volunteer_handler, health_handler, list_events_handler,
    list_suggestions_handler, list_volunteers_handler, partition_volunteers_handler,
    register_event_handler, reject_volunteer_handler, review_suggestion_handler,
    save_event_handler, save_suggestion_handler, save_volunteer_handler,
    search_volunteers_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin, since the portal UI is served separately
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route(
            "/volunteers",
            get(list_volunteers_handler).put(save_volunteer_handler),
        )
        .route("/volunteers/search", get(search_volunteers_handler))
        .route("/volunteers/by-status", get(partition_volunteers_handler))
        .route("/volunteers/:id", get(get_volunteer_handler))
        .route("/volunteers/:id/approve", post(approve_volunteer_handler))
        .route("/volunteers/:id/reject", post(reject_volunteer_handler))
        .route("/events", get(list_events_handler).put(save_event_handler))
        .route("/events/:id/register", post(register_event_handler))
        .route(
            "/suggestions",
            get(list_suggestions_handler).put(save_suggestion_handler),
        )
        .route("/suggestions/:id/review", post(review_suggestion_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
