//! API Module
//!
//! HTTP handlers and routing for the portal data service.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache statistics per collection
//! - `GET /volunteers` - Paged volunteer listing
//! - `GET /volunteers/search` - Volunteer search
//! - `GET /volunteers/by-status` - Volunteers grouped by approval status
//! - `GET /volunteers/:id` - Single volunteer
//! - `PUT /volunteers` - Insert or replace a volunteer
//! - `POST /volunteers/:id/approve` / `POST /volunteers/:id/reject`
//! - `GET|PUT /events`, `POST /events/:id/register`
//! - `GET|PUT /suggestions`, `POST /suggestions/:id/review`

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
