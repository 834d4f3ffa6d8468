//! # Real-Time Updates
//!
//! Keeps a signed-in user's dashboard current. A live socket delivers
//! `{type, data, timestamp}` updates; when the socket cannot be opened or
//! drops abnormally, a synthetic feed takes over for the rest of the session.
//!
//! Updates decode into [`UpdateEvent`] and [`dispatch`] turns them into
//! [`UiEffect`](core_runtime::events::UiEffect)s, which the session publishes
//! on the [`EventBus`](core_runtime::events::EventBus).
//!
//! ```no_run
//! use core_auth::UserRole;
//! use core_realtime::{RealtimeSession, Viewer};
//! # async fn example(
//! #     config: core_runtime::CoreConfig,
//! #     tokens: core_auth::TokenStore,
//! #     events: core_runtime::EventBus,
//! # ) {
//! let session = RealtimeSession::new(&config, tokens, events);
//! let handle = session.start(Viewer::new("tenant-101", UserRole::Tenant), false);
//!
//! handle.visibility_changed(true);
//! handle.shutdown().await;
//! # }
//! ```

pub mod dispatch;
pub mod error;
mod feed;
pub mod message;
pub mod session;

pub use dispatch::{dispatch, Viewer};
pub use error::{RealtimeError, Result};
pub use message::{UpdateEnvelope, UpdateEvent};
pub use session::{RealtimeHandle, RealtimeSession, SESSION_ENDED};
