//! Authentication extractor for admin routes.
//!
//! Reads the session cookie and verifies it via the session authority.
//! Rejections carry no detail beyond the 403 status, and the order store is
//! never touched for an unauthenticated request.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header::COOKIE, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::services::auth::{Claims, SESSION_COOKIE};
use crate::state::AppState;

/// Extractor that requires a valid admin session token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(claims): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", claims.sub)
/// }
/// ```
pub struct RequireAdmin(pub Claims);

/// Rejection for a missing or invalid session token.
///
/// Responds 403 with a bare failure body, regardless of why verification
/// failed.
pub struct AdminAuthRejection;

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::FORBIDDEN, Json(json!({ "success": false }))).into_response()
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie_value(&parts.headers, SESSION_COOKIE).ok_or(AdminAuthRejection)?;

        let claims = state
            .sessions()
            .verify(&token)
            .map_err(|_| AdminAuthRejection)?;

        Ok(Self(claims))
    }
}

/// Extract a named cookie value from the `Cookie` header.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}
