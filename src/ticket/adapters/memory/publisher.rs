//! Recording notification publisher.

use crate::ticket::{
    domain::TicketNotification,
    ports::{TicketEventPublisher, TicketPublishError},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Publisher that keeps every notification in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTicketEventPublisher {
    published: Arc<RwLock<Vec<TicketNotification>>>,
}

impl InMemoryTicketEventPublisher {
    /// Creates an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the notifications published so far, oldest first.
    ///
    /// A poisoned lock yields an empty list.
    #[must_use]
    pub fn published(&self) -> Vec<TicketNotification> {
        self.published
            .read()
            .map(|published| published.clone())
            .unwrap_or_default()
    }

    /// Returns the routing keys published so far, oldest first.
    #[must_use]
    pub fn routing_keys(&self) -> Vec<String> {
        self.published()
            .into_iter()
            .map(|notification| notification.routing_key)
            .collect()
    }
}

#[async_trait]
impl TicketEventPublisher for InMemoryTicketEventPublisher {
    async fn publish(&self, notification: &TicketNotification) -> Result<(), TicketPublishError> {
        let mut published = self
            .published
            .write()
            .map_err(|err| TicketPublishError::new(std::io::Error::other(err.to_string())))?;
        published.push(notification.clone());
        Ok(())
    }
}
