//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health        - Liveness check
//!
//! # Order intake (public)
//! POST /api/orders    - Submit a new order
//!
//! # Back office (session cookie)
//! POST /admin/login   - Admin login, sets session cookie
//! GET  /admin/orders  - List all orders, newest first
//! ```
//!
//! Static front-end assets are served from the configured document root as
//! the router fallback.

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub mod admin;
pub mod orders;

/// Build the API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/orders", post(orders::create_order))
        .route("/admin/login", post(admin::login))
        .route("/admin/orders", get(admin::list_orders))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
