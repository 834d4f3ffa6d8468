//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the RentPro client core and
//! platform-specific implementations. Each trait represents a capability the
//! core requires but that is provided differently per host (desktop shell,
//! browser, test harness).
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Async HTTP request execution
//! - [`RealtimeTransport`](realtime::RealtimeTransport) - Live update socket connections
//!
//! ### Storage
//! - [`SettingsStore`](storage::SettingsStore) - Durable key-value storage (holds the auth token)
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Available |
//! //!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type for
//! consistent error handling. Implementations should convert their native
//! errors into `BridgeError` and keep messages actionable.
//!
//! ## Thread Safety
//!
//! Bridge handles require `Send + Sync` so they can be shared across async
//! tasks behind an `Arc`. A [`RealtimeConnection`](realtime::RealtimeConnection)
//! is only `Send`: it is owned by the session task that drives it.

pub mod error;
pub mod http;
pub mod realtime;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use realtime::{CloseCode, RealtimeConnection, RealtimeTransport, SocketFrame};
pub use storage::SettingsStore;
pub use time::{Clock, LogEntry, LogLevel, LoggerSink, ManualClock, SystemClock};
