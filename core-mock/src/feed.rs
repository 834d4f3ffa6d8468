//! Polling-style fake update feed
//!
//! Emulates server push: every tick, with the configured probability, one
//! update kind is drawn uniformly from [`MOCK_UPDATE_KINDS`] and handed to
//! the subscriber's callback.

use bridge_traits::Clock;
use chrono::SecondsFormat;
use core_runtime::config::FeedSettings;
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// Update kinds the mock feed can produce.
pub const MOCK_UPDATE_KINDS: [&str; 3] = [
    "payment_submitted",
    "service_request_created",
    "notification",
];

/// One pushed update, in the `{type, data, timestamp}` shape the live socket
/// delivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushUpdate {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub timestamp: String,
}

impl PushUpdate {
    fn placeholder(kind: &str, clock: &dyn Clock) -> Self {
        Self {
            kind: kind.to_string(),
            data: json!({ "message": format!("Mock {} update", kind) }),
            timestamp: clock.now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

type Callback = Arc<dyn Fn(PushUpdate) + Send + Sync>;

/// The subscriber's end of a running feed.
#[derive(Clone)]
pub struct UpdateSink {
    gate: Arc<Mutex<bool>>,
    callback: Callback,
}

impl UpdateSink {
    /// Hands `update` to the subscriber. Returns `false` once the
    /// subscription is cancelled; the update is dropped then.
    pub fn deliver(&self, update: PushUpdate) -> bool {
        let open = self.gate.lock();
        if !*open {
            return false;
        }
        (self.callback)(update);
        true
    }
}

/// Handle to a running feed.
///
/// Once [`cancel`](Subscription::cancel) returns, the callback is never
/// invoked again. Dropping the handle cancels it too.
///
/// The callback runs on the feed task while the subscription's gate is held,
/// so it must not cancel its own subscription.
pub struct Subscription {
    user_id: String,
    active: Arc<Mutex<bool>>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Runs `feed` on the current tokio runtime. The feed pushes through the
    /// sink it is given and ends when it returns or the subscription is
    /// cancelled.
    pub fn spawn<F, Feed, Fut>(user_id: &str, callback: F, feed: Feed) -> Self
    where
        F: Fn(PushUpdate) + Send + Sync + 'static,
        Feed: FnOnce(UpdateSink) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let active = Arc::new(Mutex::new(true));
        let sink = UpdateSink {
            gate: active.clone(),
            callback: Arc::new(callback),
        };

        Self {
            user_id: user_id.to_string(),
            active,
            task: Some(tokio::spawn(feed(sink))),
        }
    }

    /// Starts the fake feed: every tick, at most one placeholder update.
    pub(crate) fn start<F>(
        user_id: &str,
        settings: FeedSettings,
        clock: Arc<dyn Clock>,
        callback: F,
    ) -> Self
    where
        F: Fn(PushUpdate) + Send + Sync + 'static,
    {
        let feed_user = user_id.to_string();
        let subscription = Self::spawn(user_id, callback, move |sink| async move {
            let mut ticker = time::interval_at(Instant::now() + settings.interval, settings.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let Some(kind) = draw(settings.probability) else {
                    trace!(user_id = %feed_user, "Mock feed tick without update");
                    continue;
                };
                debug!(user_id = %feed_user, kind, "Delivering mock update");
                if !sink.deliver(PushUpdate::placeholder(kind, clock.as_ref())) {
                    break;
                }
            }
        });

        debug!(user_id, interval_ms = settings.interval.as_millis() as u64, "Mock feed started");
        subscription
    }

    /// Stops the feed. Idempotent.
    pub fn cancel(&mut self) {
        // Waits out a callback that is running right now
        *self.active.lock() = false;

        if let Some(task) = self.task.take() {
            task.abort();
            debug!(user_id = %self.user_id, "Update feed cancelled");
        }
    }

    pub fn is_active(&self) -> bool {
        *self.active.lock()
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("user_id", &self.user_id)
            .field("active", &self.is_active())
            .finish()
    }
}

fn draw(probability: f64) -> Option<&'static str> {
    if rand::random::<f64>() >= probability {
        return None;
    }
    MOCK_UPDATE_KINDS.choose(&mut rand::thread_rng()).copied()
}
