//! Session authority: admin login and session token verification.
//!
//! Issues stateless HS256 tokens with a 7-day expiry, carried to the client
//! in an HTTP-only cookie. Tokens are verified on every admin request; there
//! is no server-side session storage and no revocation list.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AdminConfig;

/// Session lifetime: tokens expire 7 days after issue.
pub const SESSION_TTL_DAYS: i64 = 7;

/// Name of the cookie carrying the admin session token.
pub const SESSION_COOKIE: &str = "adminToken";

/// Uniform login-failure message.
///
/// Deliberately does not distinguish a wrong username from a wrong password,
/// to avoid username enumeration.
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid username or password";

/// Authentication and token errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login credentials did not match the configured admin identity.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Token failed verification. Malformed, tampered, and expired tokens
    /// all collapse into this variant; no internal detail leaks out.
    #[error("Invalid session token")]
    InvalidToken,

    /// Token could not be created.
    #[error("Token creation failed: {0}")]
    TokenCreation(String),
}

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the admin username.
    pub sub: String,
    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds).
    pub exp: i64,
}

/// Issues and verifies admin session tokens against the configured
/// credential pair and signing key.
#[derive(Clone)]
pub struct SessionAuthority {
    admin_username: String,
    admin_password: SecretString,
    signing_key: SecretString,
}

impl SessionAuthority {
    /// Create a session authority from the admin configuration.
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            admin_username: config.username.clone(),
            admin_password: config.password.clone(),
            signing_key: config.session_signing_key.clone(),
        }
    }

    /// Verify a login attempt and issue a session token on success.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on any mismatch, and
    /// `AuthError::TokenCreation` if signing fails.
    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        if username != self.admin_username || password != self.admin_password.expose_secret() {
            return Err(AuthError::InvalidCredentials);
        }
        self.issue_token(username)
    }

    /// Verify a session token's signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for any verification failure.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.signing_key.expose_secret().as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
    }

    fn issue_token(&self, username: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(SESSION_TTL_DAYS)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.signing_key.expose_secret().as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }
}
