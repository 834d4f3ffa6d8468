//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the RentPro client core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities every other core crate depends
//! on. It establishes the logging conventions, the configuration surface and
//! the event broadcasting used to reach the presentation layer.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder, Environment, FeedSettings, MockLatency, RetryPolicy};
pub use error::{Error, Result};
pub use events::{ConnectionState, CoreEvent, EventBus, ToastLevel, UiEffect};
