//! # Mock Backend
//!
//! Stands in for the remote RentPro service when no backend is configured,
//! in development, or after the network path has failed once.
//!
//! Every capability method sleeps a configurable latency, runs against a
//! shared [`RentalStore`](core_library::RentalStore) and answers with the
//! same envelope the real service would send. A timer-driven feed emulates
//! server push for the real-time layer.

pub mod backend;
pub mod feed;

pub use backend::{MockBackend, FAKE_UPLOAD_HOST};
pub use feed::{PushUpdate, Subscription, UpdateSink, MOCK_UPDATE_KINDS};
