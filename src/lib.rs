//! Workspace umbrella crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates. Host applications can depend on `rentpro-workspace`,
//! enable `desktop-shims`, and reach the whole client core through the
//! re-exported [`core_service`] façade.

#[cfg(feature = "desktop-shims")]
pub use core_service;
