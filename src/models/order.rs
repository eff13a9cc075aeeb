//! Order types for the intake and review workflow.
//!
//! Orders are submitted by unauthenticated customers, so every
//! caller-supplied field is optional and stored exactly as given.
//! Only `id`, `status`, and `created_at` are server-assigned.

use serde::{Deserialize, Serialize};

/// Initial status assigned to every order at insert time.
///
/// The column stays open-ended text so later statuses (shipped, cancelled)
/// can be introduced without a schema change.
pub const STATUS_PENDING: &str = "pending";

/// A persisted customer purchase request.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    /// Store-assigned identifier, unique and monotonically increasing.
    pub id: i64,
    /// Free-form product identifier or name.
    pub product: Option<String>,
    /// Caller-supplied quantity, unvalidated.
    pub quantity: Option<i64>,
    /// Customer name.
    pub name: Option<String>,
    /// Customer phone number.
    pub phone: Option<String>,
    /// Delivery address.
    pub address: Option<String>,
    /// Lifecycle status, `"pending"` at creation.
    pub status: String,
    /// Server-assigned insert time, RFC 3339 UTC.
    pub created_at: String,
}

/// Fields accepted from the public order-submission endpoint.
///
/// Absent fields are tolerated rather than rejected and persist as NULL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewOrder {
    pub product: Option<String>,
    pub quantity: Option<i64>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}
