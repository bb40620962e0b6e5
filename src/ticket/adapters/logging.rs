//! Notification publisher that writes events to the log.

use crate::ticket::{
    domain::TicketNotification,
    ports::{TicketEventPublisher, TicketPublishError},
};
use async_trait::async_trait;
use tracing::info;

/// Publisher used when no message broker is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTicketEventPublisher;

#[async_trait]
impl TicketEventPublisher for TracingTicketEventPublisher {
    async fn publish(&self, notification: &TicketNotification) -> Result<(), TicketPublishError> {
        info!(
            exchange = %notification.exchange,
            routing_key = %notification.routing_key,
            payload = %notification.payload,
            "ticket notification"
        );
        Ok(())
    }
}
