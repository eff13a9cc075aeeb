//! Star Orders server binary.
//!
//! Startup sequence: load configuration, initialize tracing, open the
//! database pool, ensure the schema, assemble the injected services, and
//! serve until a shutdown signal arrives.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use star_orders::config::Config;
use star_orders::db::{self, OrderStore, SqliteOrderStore};
use star_orders::services::notify::{NoopNotifier, OrderNotifier, SmtpNotifier};
use star_orders::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "star_orders=info,tower_http=debug".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Open the database and ensure the schema exists (idempotent)
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to open database");
    let store = Arc::new(SqliteOrderStore::new(pool));
    store
        .init_schema()
        .await
        .expect("Failed to initialize database schema");
    tracing::info!("Database ready");

    // Notification dispatch degrades to a no-op when SMTP is not configured
    let notifier: Arc<dyn OrderNotifier> = match &config.email {
        Some(email) => Arc::new(SmtpNotifier::new(email).expect("Failed to build SMTP transport")),
        None => {
            tracing::warn!("SMTP not configured, order notifications disabled");
            Arc::new(NoopNotifier)
        }
    };

    let addr = config.socket_addr();
    let state = AppState::new(config, store, notifier);
    let app = star_orders::app(state);

    tracing::info!("star-orders listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
