//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides production-ready implementations of the bridge traits
//! using desktop-appropriate libraries:
//! - `HttpClient` using `reqwest`
//! - `SettingsStore` using SQLite-backed key-value store
//! - `RealtimeTransport` using `tokio-tungstenite`
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, SqliteSettingsStore, TungsteniteTransport};
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = ReqwestHttpClient::new()?;
//!     let settings = SqliteSettingsStore::new(SqliteSettingsStore::default_path()).await?;
//!     let sockets = TungsteniteTransport::new();
//!
//!     // Use in core configuration
//! }
//! ```

mod http;
mod settings;
mod websocket;

pub use http::ReqwestHttpClient;
pub use settings::SqliteSettingsStore;
pub use websocket::TungsteniteTransport;
