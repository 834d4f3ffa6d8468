//! # API Client
//!
//! One stable, typed method per backend capability for the RentPro client
//! core, whether the remote backend or the in-process mock answers.
//!
//! ## Overview
//!
//! - [`ApiCommand`] is the routing table. Each command knows its HTTP
//!   endpoint and is served by exactly one mock backend method.
//! - [`ApiClient`] runs every call under the retry policy, attaches the
//!   stored bearer token, and switches to the mock backend for the rest of
//!   the session after the first network failure.
//! - [`ApiClient::subscribe_to_updates`] streams server-pushed updates, from
//!   the mock feed or a plain socket depending on the same mode.
//!
//! ## Modes
//!
//! | Condition | Calls go to |
//! |-----------|-------------|
//! | No base URL, or `development` environment | mock backend |
//! | Base URL configured | network, then mock after a failure |

pub mod client;
pub mod command;
pub mod dispatch;
pub mod error;
mod updates;

pub use client::ApiClient;
pub use command::{ApiCommand, Endpoint, RouteError};
pub use dispatch::MOCK_API_ERROR;
pub use error::{ApiError, Result};
