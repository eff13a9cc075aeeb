//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_USERNAME` - Back-office admin login name
//! - `ADMIN_PASSWORD` - Back-office admin password
//! - `SESSION_SIGNING_KEY` - Session token signing key (min 32 chars)
//!
//! ## Optional
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3000)
//! - `DATABASE_URL` - `SQLite` connection string (default: sqlite:orders.db)
//! - `CORS_ORIGINS` - Comma-separated allowed browser origins
//! - `STATIC_DIR` - Document root for front-end assets (default: public)
//!
//! ## Email (all-or-nothing group; notifications disabled when absent)
//! - `SMTP_HOST` - Outbound mail relay host
//! - `SMTP_PORT` - Relay port (default: 587)
//! - `SMTP_USERNAME` - Relay login
//! - `SMTP_PASSWORD` - Relay password
//! - `ORDER_NOTIFY_FROM` - Sender address for order notifications
//! - `ORDER_NOTIFY_TO` - Operator mailbox receiving order notifications

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SIGNING_KEY_LENGTH: usize = 32;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Top-level application configuration.
///
/// Loaded once at startup and treated as immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// `SQLite` connection string
    pub database_url: String,
    /// Admin credential pair and token signing key
    pub admin: AdminConfig,
    /// Browser origins allowed by the CORS layer
    pub cors_origins: Vec<String>,
    /// Document root for static front-end assets
    pub static_dir: PathBuf,
    /// Outbound mail relay settings; `None` disables notifications
    pub email: Option<EmailConfig>,
}

/// Admin identity and session-token signing configuration.
///
/// There is exactly one admin identity. The signing key is initialized once
/// at startup and never rotated during the process lifetime.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Admin login name
    pub username: String,
    /// Admin password (compared directly; hashing is a known hardening gap)
    pub password: SecretString,
    /// HMAC key used to sign session tokens
    pub session_signing_key: SecretString,
}

/// Outbound SMTP relay configuration for order notifications.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP relay host
    pub smtp_host: String,
    /// SMTP relay port
    pub smtp_port: u16,
    /// SMTP login name
    pub smtp_username: String,
    /// SMTP password
    pub smtp_password: SecretString,
    /// Sender address on notification messages
    pub from_address: String,
    /// Operator mailbox that receives new-order notifications
    pub operator_address: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the signing key fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let database_url = get_env_or_default("DATABASE_URL", "sqlite:orders.db");
        let admin = AdminConfig::from_env()?;
        let cors_origins = parse_origins(&get_env_or_default("CORS_ORIGINS", DEFAULT_CORS_ORIGINS));
        let static_dir = PathBuf::from(get_env_or_default("STATIC_DIR", "public"));
        let email = EmailConfig::from_env()?;

        Ok(Self {
            host,
            port,
            database_url,
            admin,
            cors_origins,
            static_dir,
            email,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AdminConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let session_signing_key = get_required_secret("SESSION_SIGNING_KEY")?;
        validate_signing_key(&session_signing_key, "SESSION_SIGNING_KEY")?;

        Ok(Self {
            username: get_required_env("ADMIN_USERNAME")?,
            password: get_required_secret("ADMIN_PASSWORD")?,
            session_signing_key,
        })
    }
}

impl EmailConfig {
    /// Loads the SMTP group. Returns `Ok(None)` when `SMTP_HOST` is unset;
    /// once it is set, the remaining variables in the group are required.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = get_optional_env("SMTP_HOST") else {
            return Ok(None);
        };

        let smtp_port = get_env_or_default("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string()))?;

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            smtp_username: get_required_env("SMTP_USERNAME")?,
            smtp_password: get_required_secret("SMTP_PASSWORD")?,
            from_address: get_required_env("ORDER_NOTIFY_FROM")?,
            operator_address: get_required_env("ORDER_NOTIFY_TO")?,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Split a comma-separated origin list, dropping empty entries.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Validate that the token signing key meets minimum length requirements.
fn validate_signing_key(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SIGNING_KEY_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SIGNING_KEY_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}
