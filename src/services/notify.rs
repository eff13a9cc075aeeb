//! Order notification dispatch.
//!
//! Sends a summary email to the operator mailbox when an order is created.
//! Delivery is strictly fire-and-forget: the order-creation response never
//! waits on, or fails because of, the mail relay. There is no retry queue;
//! a failed delivery is logged and dropped.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::models::Order;

/// Errors that can occur when sending a notification.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build the email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Outbound notifier for newly created orders.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    /// Compose and submit a new-order notification.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the message cannot be built or delivered.
    /// Callers on the request path must not propagate this error.
    async fn notify_new_order(&self, order: &Order) -> Result<(), EmailError>;
}

/// Hand a notification to the background executor.
///
/// The spawned task owns the order; its outcome is logged and never reaches
/// the request path.
pub fn dispatch(notifier: Arc<dyn OrderNotifier>, order: Order) {
    tokio::spawn(async move {
        if let Err(err) = notifier.notify_new_order(&order).await {
            tracing::warn!(order_id = order.id, error = %err, "Order notification failed");
        }
    });
}

/// SMTP-backed [`OrderNotifier`] for production use.
#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    operator_address: String,
}

impl SmtpNotifier {
    /// Create a notifier from the mail relay configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay parameters are invalid.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            operator_address: config.operator_address.clone(),
        })
    }
}

#[async_trait]
impl OrderNotifier for SmtpNotifier {
    async fn notify_new_order(&self, order: &Order) -> Result<(), EmailError> {
        let subject = format!("New order #{}", order.id);
        let text = order_summary_text(order);
        let html = order_summary_html(order);

        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(self
                .operator_address
                .parse()
                .map_err(|_| EmailError::InvalidAddress(self.operator_address.clone()))?)
            .subject(&subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(order_id = order.id, to = %self.operator_address, "Order notification sent");
        Ok(())
    }
}

/// No-op [`OrderNotifier`] used when SMTP is not configured.
pub struct NoopNotifier;

#[async_trait]
impl OrderNotifier for NoopNotifier {
    async fn notify_new_order(&self, order: &Order) -> Result<(), EmailError> {
        tracing::debug!(order_id = order.id, "SMTP not configured, skipping order notification");
        Ok(())
    }
}

fn field(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Plain text order summary for the notification body.
fn order_summary_text(order: &Order) -> String {
    format!(
        "New order received\n\n\
         Order ID: {}\n\
         Product:  {}\n\
         Quantity: {}\n\
         Name:     {}\n\
         Phone:    {}\n\
         Address:  {}\n",
        order.id,
        field(order.product.as_deref()),
        order
            .quantity
            .map_or_else(|| "-".to_string(), |q| q.to_string()),
        field(order.name.as_deref()),
        field(order.phone.as_deref()),
        field(order.address.as_deref()),
    )
}

/// HTML order summary for mail clients that render it.
fn order_summary_html(order: &Order) -> String {
    format!(
        "<h2>New order received</h2>\
         <p>Order ID: <b>{}</b></p>\
         <p>Product: {}</p>\
         <p>Quantity: {}</p>\
         <p>Name: {}</p>\
         <p>Phone: {}</p>\
         <p>Address: {}</p>",
        order.id,
        field(order.product.as_deref()),
        order
            .quantity
            .map_or_else(|| "-".to_string(), |q| q.to_string()),
        field(order.name.as_deref()),
        field(order.phone.as_deref()),
        field(order.address.as_deref()),
    )
}
