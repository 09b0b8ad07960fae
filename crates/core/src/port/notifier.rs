//! Notifier Port
//!
//! Outbound customer messages (SMS, push, ...). Delivery is best-effort: the
//! queue service logs failures and never rolls back a queue mutation because
//! of them.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// Notification failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Recipient rejected: {0}")]
    Rejected(String),
}

/// Notifier interface
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a human-readable message to a customer contact
    async fn notify(&self, contact: &str, message: &str) -> Result<(), NotifyError>;
}

/// Notifier that only writes the message to the log
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, contact: &str, message: &str) -> Result<(), NotifyError> {
        info!(contact = %contact, message = %message, "Customer notification");
        Ok(())
    }
}
