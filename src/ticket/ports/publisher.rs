//! Outbound port for ticket lifecycle notifications.

use crate::ticket::domain::TicketNotification;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Publishes encoded ticket events to a message broker.
///
/// Publishing is fire-and-forget from the caller's point of view: services
/// log a failure and carry on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketEventPublisher: Send + Sync {
    /// Publishes one notification.
    ///
    /// # Errors
    ///
    /// Returns [`TicketPublishError`] when the broker rejects the message or
    /// cannot be reached.
    async fn publish(&self, notification: &TicketNotification) -> Result<(), TicketPublishError>;
}

/// Failure to hand a notification to the broker.
#[derive(Debug, Clone, Error)]
#[error("failed to publish ticket notification: {0}")]
pub struct TicketPublishError(Arc<dyn std::error::Error + Send + Sync>);

impl TicketPublishError {
    /// Wraps the underlying failure.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}
