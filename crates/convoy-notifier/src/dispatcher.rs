//! Event dispatch over an immutable, swappable route table.
//!
//! The dispatcher compiles one [`Matcher`] per installed route and
//! publishes the whole compiled table behind a single lock write. Matchers
//! are never mutated after construction, so concurrent dispatch needs no
//! synchronization beyond cloning the current table handle; in-flight
//! dispatch keeps using the table it already holds across a swap.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use convoy_model::Event;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::NotificationRoute;
use crate::matcher::Matcher;
use crate::notify::Notifier;

/// Upper bound on retained delivery records.
const HISTORY_LIMIT: usize = 10_000;
/// Number of oldest records dropped when the bound is hit.
const HISTORY_DRAIN: usize = 1_000;

/// One installed route: the rule, its compiled matcher, and its channel.
struct RouteEntry {
    route: NotificationRoute,
    matcher: Matcher,
    notifier: Arc<dyn Notifier>,
}

/// Record of one delivery attempt.
#[derive(Debug, Clone)]
pub struct DeliveryRecord {
    /// Unique identifier for this record.
    pub id: Uuid,
    /// Name of the route that matched.
    pub route: String,
    /// Name of the channel the event was handed to.
    pub notifier: String,
    /// String form of the delivered event's kind.
    pub event_type: &'static str,
    /// Whether the channel accepted the event.
    pub success: bool,
    /// Channel error, when it did not.
    pub error: Option<String>,
    /// When the delivery was attempted.
    pub sent_at: DateTime<Utc>,
}

/// Routes lifecycle events to notification channels.
pub struct Dispatcher {
    table: RwLock<Arc<Vec<RouteEntry>>>,
    history: RwLock<Vec<DeliveryRecord>>,
}

impl Dispatcher {
    /// Creates a dispatcher with an empty route table.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Arc::new(Vec::new())),
            history: RwLock::new(Vec::new()),
        }
    }

    /// Installs a new route set, replacing the previous one wholesale.
    ///
    /// Each route is compiled to a matcher and bound to its channel here.
    /// The swap is atomic from the point of view of `dispatch`: a dispatch
    /// sees either the old table or the new one, never a mix.
    pub async fn install_routes(&self, routes: Vec<(NotificationRoute, Arc<dyn Notifier>)>) {
        let entries: Vec<RouteEntry> = routes
            .into_iter()
            .map(|(route, notifier)| RouteEntry {
                matcher: Matcher::new(&route),
                route,
                notifier,
            })
            .collect();

        let count = entries.len();
        let mut table = self.table.write().await;
        *table = Arc::new(entries);
        debug!(routes = count, "route table installed");
    }

    /// Number of installed routes.
    pub async fn route_count(&self) -> usize {
        self.table.read().await.len()
    }

    /// Names of the routes that would receive `event`, without delivering.
    pub async fn matching_routes(&self, event: &Event) -> Vec<String> {
        let table = Arc::clone(&*self.table.read().await);
        table
            .iter()
            .filter(|entry| entry.matcher.matches(event))
            .map(|entry| entry.route.name.clone())
            .collect()
    }

    /// Evaluates every route against `event` and delivers to the matches.
    ///
    /// Returns the number of routes the event matched. Delivery failures
    /// are recorded and counted, never propagated: a channel that fails
    /// must not keep the event from the remaining routes.
    #[instrument(skip(self, event), fields(event_type = event.kind().as_str()))]
    pub async fn dispatch(&self, event: &Event) -> usize {
        let table = Arc::clone(&*self.table.read().await);
        metrics::counter!("notifier_events_dispatched").increment(1);

        let mut matched = 0;
        for entry in table.iter() {
            if !entry.matcher.matches(event) {
                continue;
            }
            matched += 1;
            metrics::counter!("notifier_routes_matched").increment(1);
            debug!(route = %entry.route.name, receiver = %entry.route.receiver, "route matched");

            match entry.notifier.send(event).await {
                Ok(()) => {
                    self.record(entry, event, true, None).await;
                }
                Err(e) => {
                    warn!(route = %entry.route.name, error = %e, "delivery failed");
                    metrics::counter!("notifier_deliveries_failed").increment(1);
                    self.record(entry, event, false, Some(e.to_string())).await;
                }
            }
        }
        matched
    }

    async fn record(&self, entry: &RouteEntry, event: &Event, success: bool, error: Option<String>) {
        let record = DeliveryRecord {
            id: Uuid::new_v4(),
            route: entry.route.name.clone(),
            notifier: entry.notifier.name().to_string(),
            event_type: event.kind().as_str(),
            success,
            error,
            sent_at: Utc::now(),
        };

        let mut history = self.history.write().await;
        history.push(record);
        if history.len() > HISTORY_LIMIT {
            history.drain(..HISTORY_DRAIN);
        }
    }

    /// Most recent delivery records, newest first.
    pub async fn history(&self, limit: Option<usize>) -> Vec<DeliveryRecord> {
        let history = self.history.read().await;
        let records = history.iter().rev().cloned();
        match limit {
            Some(n) => records.take(n).collect(),
            None => records.collect(),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
