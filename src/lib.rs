//! Star Orders - order intake and back-office review service.
//!
//! # Architecture
//!
//! - Axum web framework on Tokio
//! - `SQLite` (via sqlx) for durable order storage
//! - Stateless HS256 session tokens for admin authorization
//! - Fire-and-forget SMTP notification on order creation
//!
//! The public surface is three JSON endpoints: unauthenticated order
//! submission, admin login, and the cookie-protected order listing. Static
//! front-end assets are served from the configured document root.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::Router;
use axum::http::{HeaderValue, Method, header::CONTENT_TYPE};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use config::Config;
use state::AppState;

/// Build the complete application router.
///
/// API routes take precedence; anything else falls through to the static
/// file service rooted at the configured document root.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.config());
    let static_dir = state.config().static_dir.clone();

    routes::routes()
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS layer allowing the configured browser origins with credentials,
/// so the front end can send the session cookie cross-origin.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}
