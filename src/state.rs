//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::db::OrderStore;
use crate::services::auth::SessionAuthority;
use crate::services::notify::OrderNotifier;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The store and notifier are injected at
/// construction, so tests can substitute in-memory and no-op doubles.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: Arc<dyn OrderStore>,
    notifier: Arc<dyn OrderNotifier>,
    sessions: SessionAuthority,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The session authority is built from the admin section of `config`;
    /// its signing key is fixed for the process lifetime.
    #[must_use]
    pub fn new(config: Config, store: Arc<dyn OrderStore>, notifier: Arc<dyn OrderNotifier>) -> Self {
        let sessions = SessionAuthority::new(&config.admin);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                notifier,
                sessions,
            }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get a reference to the order store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn OrderStore> {
        &self.inner.store
    }

    /// Get a reference to the order notifier.
    #[must_use]
    pub fn notifier(&self) -> &Arc<dyn OrderNotifier> {
        &self.inner.notifier
    }

    /// Get a reference to the session authority.
    #[must_use]
    pub fn sessions(&self) -> &SessionAuthority {
        &self.inner.sessions
    }
}
