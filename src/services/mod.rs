//! Business services: session authority and order notification dispatch.

pub mod auth;
pub mod notify;

pub use auth::{AuthError, Claims, SessionAuthority};
pub use notify::{EmailError, NoopNotifier, OrderNotifier, SmtpNotifier};
