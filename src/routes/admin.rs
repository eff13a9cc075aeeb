//! Back-office endpoints: admin login and order listing.

use axum::{
    Json,
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Order;
use crate::services::auth::{AuthError, LOGIN_FAILED_MESSAGE, SESSION_COOKIE, SESSION_TTL_DAYS};
use crate::state::AppState;

/// Login request body. Absent fields are treated as a mismatch rather than
/// rejected, matching the permissive intake behavior elsewhere.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Response body for the admin order listing.
#[derive(Debug, Serialize)]
pub struct ListOrdersResponse {
    pub success: bool,
    pub orders: Vec<Order>,
}

/// Admin login.
///
/// On match, issues a 7-day session token delivered as an HTTP-only cookie.
/// On mismatch, responds 200 with a uniform failure message that does not
/// distinguish wrong username from wrong password.
#[instrument(skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response> {
    let username = req.username.as_deref().unwrap_or_default();
    let password = req.password.as_deref().unwrap_or_default();

    match state.sessions().login(username, password) {
        Ok(token) => {
            tracing::info!(username, "Admin login succeeded");
            // No Secure flag: this layer is not TLS-terminated (hardening gap)
            let cookie = format!(
                "{SESSION_COOKIE}={token}; HttpOnly; Path=/; Max-Age={}",
                SESSION_TTL_DAYS * 24 * 60 * 60
            );
            Ok(([(SET_COOKIE, cookie)], Json(json!({ "success": true }))).into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Admin login failed");
            Ok(Json(json!({ "success": false, "message": LOGIN_FAILED_MESSAGE })).into_response())
        }
        Err(err) => Err(AppError::Internal(err.to_string())),
    }
}

/// List all orders, newest first.
///
/// The `RequireAdmin` extractor rejects the request with 403 before this
/// handler runs, so an unauthenticated caller never reaches the store.
#[instrument(skip(state))]
pub async fn list_orders(
    RequireAdmin(_claims): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<ListOrdersResponse>> {
    let orders = state.store().list_orders().await?;

    Ok(Json(ListOrdersResponse {
        success: true,
        orders,
    }))
}
