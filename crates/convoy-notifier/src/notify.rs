//! Channel delivery seam.
//!
//! Actual senders (chat, webhook) live outside this crate; the dispatcher
//! only needs something that can accept a matched event. [`LogNotifier`]
//! is the in-repo implementation, backed by tracing.

use async_trait::async_trait;
use convoy_model::Event;
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced by a notification channel.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The channel failed to accept the event.
    #[error("failed to deliver notification: {0}")]
    DeliveryFailed(String),

    /// The channel is misconfigured.
    #[error("invalid channel configuration: {0}")]
    InvalidConfig(String),
}

/// A notification channel capable of receiving matched events.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one event to the channel.
    async fn send(&self, event: &Event) -> Result<(), NotifyError>;

    /// The channel name, used in logs and delivery records.
    fn name(&self) -> &str;
}

/// A notifier that writes events to the log instead of a channel.
#[derive(Debug, Default)]
pub struct LogNotifier {
    name: String,
}

impl LogNotifier {
    /// Creates a new log notifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, event: &Event) -> Result<(), NotifyError> {
        info!(
            notifier = %self.name,
            event_type = event.kind().as_str(),
            application_id = event.application_id().unwrap_or("-"),
            environment_id = event.environment_id().unwrap_or("-"),
            "event delivered"
        );
        debug!(event = ?event, "delivered event payload");
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
