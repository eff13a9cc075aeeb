//! Public order intake endpoint.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::models::NewOrder;
use crate::services::notify;
use crate::state::AppState;

/// Response body for a successful order submission.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    #[serde(rename = "orderId")]
    pub order_id: i64,
}

/// Submit a new order.
///
/// Intentionally unauthenticated: customers submit orders without logging
/// in. Fields are accepted as given, including empty or absent ones; the
/// store assigns `status` and `created_at`. The operator notification is
/// handed to a background task and never affects the response.
#[instrument(skip(state, new))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(new): Json<NewOrder>,
) -> Result<Json<CreateOrderResponse>> {
    let order = state.store().insert_order(&new).await?;
    let order_id = order.id;

    tracing::info!(order_id, "Order created");
    notify::dispatch(state.notifier().clone(), order);

    Ok(Json(CreateOrderResponse {
        success: true,
        order_id,
    }))
}
