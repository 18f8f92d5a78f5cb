//! Notification routing for the Convoy continuous delivery agent.
//!
//! Operators declare routes, one per notification channel, that select
//! lifecycle events across four independent dimensions: event type, event
//! group, application, and environment. Each dimension supports an allow
//! list and a deny list; deny wins. This crate compiles those routes into
//! stateless matchers, evaluates every incoming event against them, and
//! hands the matches to the channel delivery seam.

pub mod config;
pub mod dispatcher;
pub mod matcher;
pub mod notify;

pub use config::{ConfigError, NotificationConfig, NotificationRoute};
pub use dispatcher::{DeliveryRecord, Dispatcher};
pub use matcher::Matcher;
pub use notify::{LogNotifier, Notifier, NotifyError};
