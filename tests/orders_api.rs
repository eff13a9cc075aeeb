//! Integration tests driving the full router.
//!
//! The application state is assembled the same way `main` does it, but with
//! an in-memory `SQLite` pool and a no-op notifier. Store and notifier
//! doubles cover the failure-injection and access-counting cases.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{
    Request, StatusCode,
    header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
};
use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use star_orders::config::{AdminConfig, Config};
use star_orders::db::{OrderStore, RepositoryError, SqliteOrderStore};
use star_orders::models::{NewOrder, Order, STATUS_PENDING};
use star_orders::services::auth::Claims;
use star_orders::services::notify::{EmailError, NoopNotifier, OrderNotifier};
use star_orders::state::AppState;

const SIGNING_KEY: &str = "0123456789abcdef0123456789abcdef";

// =============================================================================
// Test Harness
// =============================================================================

fn test_config() -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        admin: AdminConfig {
            username: "admin".to_string(),
            password: SecretString::from("admin123"),
            session_signing_key: SecretString::from(SIGNING_KEY),
        },
        cors_origins: vec!["http://localhost:3000".to_string()],
        static_dir: PathBuf::from("public"),
        email: None,
    }
}

/// App over a real in-memory `SQLite` store and a no-op notifier.
async fn sqlite_app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = Arc::new(SqliteOrderStore::new(pool));
    store.init_schema().await.unwrap();

    star_orders::app(AppState::new(test_config(), store, Arc::new(NoopNotifier)))
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Extract the session cookie pair (`adminToken=...`) from a login response.
fn session_cookie(response: &axum::response::Response) -> Option<String> {
    let header = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    Some(header.split(';').next()?.to_string())
}

async fn login(app: &Router, username: &str, password: &str) -> axum::response::Response {
    app.clone()
        .oneshot(json_request(
            "POST",
            "/admin/login",
            &json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap()
}

// =============================================================================
// Test Doubles
// =============================================================================

/// In-memory store counting every access, for verifying that rejected
/// requests never reach the persistence layer.
#[derive(Default)]
struct CountingStore {
    orders: Mutex<Vec<Order>>,
    next_id: AtomicI64,
    list_calls: AtomicUsize,
    insert_calls: AtomicUsize,
}

#[async_trait]
impl OrderStore for CountingStore {
    async fn init_schema(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn insert_order(&self, new: &NewOrder) -> Result<Order, RepositoryError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let order = Order {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            product: new.product.clone(),
            quantity: new.quantity,
            name: new.name.clone(),
            phone: new.phone.clone(),
            address: new.address.clone(),
            status: STATUS_PENDING.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        self.orders.lock().unwrap().push(order.clone());
        Ok(order)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let mut orders = self.orders.lock().unwrap().clone();
        orders.reverse();
        Ok(orders)
    }
}

/// Store whose every operation fails, for the storage-error path.
struct BrokenStore;

#[async_trait]
impl OrderStore for BrokenStore {
    async fn init_schema(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::Database(sqlx::Error::PoolClosed))
    }

    async fn insert_order(&self, _new: &NewOrder) -> Result<Order, RepositoryError> {
        Err(RepositoryError::Database(sqlx::Error::PoolClosed))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        Err(RepositoryError::Database(sqlx::Error::PoolClosed))
    }
}

/// Notifier whose delivery always fails.
struct FailingNotifier;

#[async_trait]
impl OrderNotifier for FailingNotifier {
    async fn notify_new_order(&self, _order: &Order) -> Result<(), EmailError> {
        Err(EmailError::InvalidAddress("relay unreachable".to_string()))
    }
}

// =============================================================================
// End-to-End Scenario
// =============================================================================

#[tokio::test]
async fn test_end_to_end_order_and_admin_review() {
    let app = sqlite_app().await;
    let before = Utc::now();

    // Customer submits an order without logging in
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/orders",
            &json!({
                "product": "Star Map",
                "quantity": 2,
                "name": "Alice",
                "phone": "555-1234",
                "address": "1 Sky Way"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["orderId"], 1);

    // Admin logs in and receives the session cookie
    let response = login(&app, "admin", "admin123").await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).expect("login should set the session cookie");
    let body = body_json(response).await;
    assert_eq!(body["success"], true);

    // The listing contains exactly the submitted row
    let response = app
        .clone()
        .oneshot(get_request("/admin/orders", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);

    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order["id"], 1);
    assert_eq!(order["product"], "Star Map");
    assert_eq!(order["quantity"], 2);
    assert_eq!(order["name"], "Alice");
    assert_eq!(order["phone"], "555-1234");
    assert_eq!(order["address"], "1 Sky Way");
    assert_eq!(order["status"], "pending");

    let created_at = DateTime::parse_from_rfc3339(order["created_at"].as_str().unwrap()).unwrap();
    assert!(created_at >= before);
}

// =============================================================================
// Order Intake
// =============================================================================

#[tokio::test]
async fn test_listing_is_newest_first() {
    let app = sqlite_app().await;

    for product in ["A", "B", "C"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/orders",
                &json!({ "product": product }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let cookie = session_cookie(&login(&app, "admin", "admin123").await).unwrap();
    let response = app
        .clone()
        .oneshot(get_request("/admin/orders", Some(&cookie)))
        .await
        .unwrap();
    let body = body_json(response).await;

    let products: Vec<&str> = body["orders"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["product"].as_str().unwrap())
        .collect();
    assert_eq!(products, vec!["C", "B", "A"]);
}

#[tokio::test]
async fn test_order_intake_accepts_empty_body() {
    let app = sqlite_app().await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/orders", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["orderId"], 1);

    let cookie = session_cookie(&login(&app, "admin", "admin123").await).unwrap();
    let response = app
        .clone()
        .oneshot(get_request("/admin/orders", Some(&cookie)))
        .await
        .unwrap();
    let body = body_json(response).await;
    let order = &body["orders"][0];
    assert_eq!(order["product"], Value::Null);
    assert_eq!(order["quantity"], Value::Null);
    assert_eq!(order["status"], "pending");
}

#[tokio::test]
async fn test_notification_failure_does_not_fail_order_creation() {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = Arc::new(SqliteOrderStore::new(pool));
    store.init_schema().await.unwrap();
    let app = star_orders::app(AppState::new(
        test_config(),
        store,
        Arc::new(FailingNotifier),
    ));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/orders",
            &json!({ "product": "Star Map", "quantity": 1 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["orderId"], 1);
}

#[tokio::test]
async fn test_storage_failure_fails_cleanly() {
    let app = star_orders::app(AppState::new(
        test_config(),
        Arc::new(BrokenStore),
        Arc::new(NoopNotifier),
    ));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/orders",
            &json!({ "product": "Star Map" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

// =============================================================================
// Admin Login
// =============================================================================

#[tokio::test]
async fn test_login_with_wrong_credentials_sets_no_cookie() {
    let app = sqlite_app().await;

    for (username, password) in [("admin", "wrong"), ("root", "admin123")] {
        let response = login(&app, username, password).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(session_cookie(&response).is_none());
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_login_failure_message_is_uniform() {
    let app = sqlite_app().await;

    let wrong_pass = body_json(login(&app, "admin", "wrong").await).await;
    let wrong_user = body_json(login(&app, "nobody", "admin123").await).await;

    assert_eq!(wrong_pass["message"], wrong_user["message"]);
}

#[tokio::test]
async fn test_login_cookie_is_http_only() {
    let app = sqlite_app().await;

    let response = login(&app, "admin", "admin123").await;
    let header = response
        .headers()
        .get(SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();

    assert!(header.starts_with("adminToken="));
    assert!(header.contains("HttpOnly"));
}

// =============================================================================
// Admin Authorization
// =============================================================================

#[tokio::test]
async fn test_listing_without_cookie_is_403_and_skips_store() {
    let store = Arc::new(CountingStore::default());
    let app = star_orders::app(AppState::new(
        test_config(),
        store.clone(),
        Arc::new(NoopNotifier),
    ));

    let response = app.oneshot(get_request("/admin/orders", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(store.list_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_listing_with_tampered_token_is_403_and_skips_store() {
    let store = Arc::new(CountingStore::default());
    let app = star_orders::app(AppState::new(
        test_config(),
        store.clone(),
        Arc::new(NoopNotifier),
    ));

    let cookie = session_cookie(&login(&app, "admin", "admin123").await).unwrap();
    let mut tampered = cookie.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let response = app
        .oneshot(get_request("/admin/orders", Some(&tampered)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(store.list_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_listing_with_expired_token_is_403_and_skips_store() {
    let store = Arc::new(CountingStore::default());
    let app = star_orders::app(AppState::new(
        test_config(),
        store.clone(),
        Arc::new(NoopNotifier),
    ));

    // Token signed with the right key but expired well past validation leeway
    let now = Utc::now();
    let claims = Claims {
        sub: "admin".to_string(),
        iat: (now - Duration::days(8)).timestamp(),
        exp: (now - Duration::days(1)).timestamp(),
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(SIGNING_KEY.as_bytes()),
    )
    .unwrap();

    let response = app
        .oneshot(get_request(
            "/admin/orders",
            Some(&format!("adminToken={token}")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(store.list_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_listing_with_valid_cookie_reads_store_once() {
    let store = Arc::new(CountingStore::default());
    let app = star_orders::app(AppState::new(
        test_config(),
        store.clone(),
        Arc::new(NoopNotifier),
    ));

    let cookie = session_cookie(&login(&app, "admin", "admin123").await).unwrap();
    let response = app
        .oneshot(get_request("/admin/orders", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.list_calls.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = sqlite_app().await;

    let response = app.oneshot(get_request("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}
