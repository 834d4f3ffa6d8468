//! # Event Bus System
//!
//! Provides an event-driven architecture for the RentPro client core using `tokio::sync::broadcast`.
//! This module enables decoupled communication between core modules and the host UI
//! through typed events.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **Event Types**: Strongly-typed enum hierarchies for different domains
//! - **EventBus**: Central broadcast channel for publishing events
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    emit      ┌───────────┐
//! │  API Client  ├─────────────>│           │
//! └──────────────┘              │           │
//!                               │ EventBus  │     subscribe    ┌─────────┐
//! ┌──────────────┐    emit      │ (broadcast├─────────────────>│ Host UI │
//! │ Realtime Ses.├─────────────>│  channel) │                  └─────────┘
//! └──────────────┘              └───────────┘
//! ```
//!
//! UI side effects (toasts, refresh requests) travel as [`CoreEvent::Ui`]; the
//! host decides how to render them.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, ToastLevel, UiEffect};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Ui(UiEffect::toast(ToastLevel::Info, "Room 101 updated")))
//!     .ok();
//!
//! let event = subscriber.recv().await.unwrap();
//! assert!(matches!(event, CoreEvent::Ui(UiEffect::Toast { .. })));
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: Subscriber was too slow and missed `n` events.
//!   This is non-fatal; the subscriber can continue receiving new events.
//! - **`RecvError::Closed`**: All senders have been dropped. This indicates shutdown.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Authentication-related events
    Auth(AuthEvent),
    /// API client mode and retry events
    Api(ApiEvent),
    /// Real-time session lifecycle events
    Realtime(RealtimeEvent),
    /// Side effects the host UI should perform
    Ui(UiEffect),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Auth(e) => e.description(),
            CoreEvent::Api(e) => e.description(),
            CoreEvent::Realtime(e) => e.description(),
            CoreEvent::Ui(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Auth(AuthEvent::AuthError { .. }) => EventSeverity::Error,
            CoreEvent::Api(ApiEvent::RequestFailed { .. }) => EventSeverity::Error,
            CoreEvent::Api(ApiEvent::MockModeActivated { .. }) => EventSeverity::Warning,
            CoreEvent::Ui(UiEffect::Toast { level, .. }) => match level {
                ToastLevel::Error => EventSeverity::Error,
                ToastLevel::Warning => EventSeverity::Warning,
                ToastLevel::Success | ToastLevel::Info => EventSeverity::Info,
            },
            CoreEvent::Ui(UiEffect::Log { level, .. }) => *level,
            CoreEvent::Auth(AuthEvent::SignedIn { .. }) => EventSeverity::Info,
            CoreEvent::Realtime(RealtimeEvent::StateChanged { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Authentication Events
// ============================================================================

/// Events related to the signed-in session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum AuthEvent {
    /// Login succeeded and the token was persisted.
    SignedIn {
        /// The authenticated user's id.
        user_id: String,
        /// `tenant` or `owner`.
        role: String,
    },
    /// The stored token was removed.
    SignedOut,
    /// A fresh token replaced the stored one.
    TokenRefreshed,
    /// Token persistence failed.
    AuthError {
        /// Human-readable error message.
        message: String,
        /// Whether the error is recoverable (e.g., retry possible).
        recoverable: bool,
    },
}

impl AuthEvent {
    fn description(&self) -> &str {
        match self {
            AuthEvent::SignedIn { .. } => "User signed in successfully",
            AuthEvent::SignedOut => "User signed out",
            AuthEvent::TokenRefreshed => "Token refreshed successfully",
            AuthEvent::AuthError { .. } => "Authentication error",
        }
    }
}

// ============================================================================
// API Events
// ============================================================================

/// Events raised by the API client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum ApiEvent {
    /// The client switched to the mock backend for the rest of the session.
    MockModeActivated {
        /// What failed on the network path.
        reason: String,
    },
    /// An attempt failed and another one is scheduled.
    RetryScheduled {
        /// Logical operation name (e.g. `get_all_rooms`).
        operation: String,
        /// The attempt that just failed, starting at 1.
        attempt: u32,
        /// Delay before the next attempt.
        delay_ms: u64,
    },
    /// Every attempt failed.
    RequestFailed {
        /// Logical operation name.
        operation: String,
        /// The last error.
        message: String,
        /// Attempts made.
        attempts: u32,
    },
}

impl ApiEvent {
    fn description(&self) -> &str {
        match self {
            ApiEvent::MockModeActivated { .. } => "Switched to mock backend",
            ApiEvent::RetryScheduled { .. } => "Retrying request",
            ApiEvent::RequestFailed { .. } => "Request failed",
        }
    }
}

// ============================================================================
// Realtime Events
// ============================================================================

/// Connection state of the real-time update session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No channel open. Initial and terminal state.
    Disconnected,
    /// Opening a live socket.
    Connecting,
    /// Live socket open.
    Live,
    /// Synthetic timer feed running.
    MockActive,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Live => "live",
            ConnectionState::MockActive => "mock_active",
        };
        f.write_str(label)
    }
}

/// Events related to the real-time update session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum RealtimeEvent {
    /// The session moved between states.
    StateChanged {
        from: ConnectionState,
        to: ConnectionState,
    },
    /// An inbound message could not be decoded and was dropped.
    MessageDropped {
        /// Decoder error.
        reason: String,
    },
}

impl RealtimeEvent {
    fn description(&self) -> &str {
        match self {
            RealtimeEvent::StateChanged { .. } => "Real-time connection state changed",
            RealtimeEvent::MessageDropped { .. } => "Malformed real-time message dropped",
        }
    }
}

// ============================================================================
// UI Effects
// ============================================================================

/// Toast flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A UI side effect described as data.
///
/// Produced by the real-time dispatcher; rendered by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum UiEffect {
    /// Show a transient notification.
    Toast { level: ToastLevel, message: String },
    /// Reload dashboard data.
    Refresh,
    /// Diagnostic message, not shown to the user.
    Log {
        level: EventSeverity,
        message: String,
    },
}

impl UiEffect {
    pub fn toast(level: ToastLevel, message: impl Into<String>) -> Self {
        UiEffect::Toast {
            level,
            message: message.into(),
        }
    }

    pub fn log(level: EventSeverity, message: impl Into<String>) -> Self {
        UiEffect::Log {
            level,
            message: message.into(),
        }
    }

    fn description(&self) -> &str {
        match self {
            UiEffect::Toast { .. } => "Show toast",
            UiEffect::Refresh => "Refresh data",
            UiEffect::Log { .. } => "Log message",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends (events are cloned for each subscriber)
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events to buffer per subscriber.
    ///   When a subscriber falls behind by more than this amount, it will
    ///   receive a `RecvError::Lagged` error.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Creates a new event bus with the default buffer size.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event.
    /// Returns an error if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Each call creates an independent receiver that will receive all future events.
    /// Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    ///
    /// ```rust
    /// use core_runtime::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.subscriber_count(), 0);
    ///
    /// let _subscriber = event_bus.subscribe();
    /// assert_eq!(event_bus.subscriber_count(), 1);
    /// ```
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in() -> CoreEvent {
        CoreEvent::Auth(AuthEvent::SignedIn {
            user_id: "tenant-101".to_string(),
            role: "tenant".to_string(),
        })
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(signed_in()).is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = CoreEvent::Ui(UiEffect::Refresh);
        assert_eq!(bus.emit(event.clone()).unwrap(), 2);

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for _ in 0..5 {
            bus.emit(CoreEvent::Ui(UiEffect::Refresh)).ok();
        }

        let result = sub.recv().await;
        assert!(matches!(result, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_event_severity() {
        let error_toast = CoreEvent::Ui(UiEffect::toast(
            ToastLevel::Error,
            "Your payment was rejected. Please contact the owner.",
        ));
        assert_eq!(error_toast.severity(), EventSeverity::Error);

        let fallback = CoreEvent::Api(ApiEvent::MockModeActivated {
            reason: "timeout".to_string(),
        });
        assert_eq!(fallback.severity(), EventSeverity::Warning);

        assert_eq!(signed_in().severity(), EventSeverity::Info);
        assert_eq!(CoreEvent::Ui(UiEffect::Refresh).severity(), EventSeverity::Debug);
    }

    #[test]
    fn test_event_description() {
        assert_eq!(signed_in().description(), "User signed in successfully");
        assert_eq!(
            CoreEvent::Realtime(RealtimeEvent::StateChanged {
                from: ConnectionState::Connecting,
                to: ConnectionState::Live,
            })
            .description(),
            "Real-time connection state changed"
        );
    }

    #[test]
    fn test_event_serialization() {
        let event = CoreEvent::Ui(UiEffect::toast(ToastLevel::Info, "Room 101 updated"));
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "Ui");
        assert_eq!(json["payload"]["effect"], "toast");
        assert_eq!(json["payload"]["level"], "info");

        let back: CoreEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_connection_state_display() {
        assert_eq!(ConnectionState::MockActive.to_string(), "mock_active");
        assert_eq!(
            serde_json::to_string(&ConnectionState::Live).unwrap(),
            "\"live\""
        );
    }
}
