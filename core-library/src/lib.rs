//! # Rental Library Module
//!
//! Domain records and the in-memory repository behind the mock backend.
//!
//! ## Overview
//!
//! - `models` - tenants, rooms, payments, service requests, notifications,
//!   files and analytics, with their wire (camelCase) representation
//! - `envelope` - the `ApiResponse<T>` envelope every call returns
//! - `pagination` - page requests and paginated lists
//! - `store` - `RentalStore`, the process-local repository with its
//!   invariants (room occupancy, one-directional statuses)

pub mod envelope;
pub mod error;
pub mod models;
pub mod pagination;
pub mod seed;
pub mod store;

pub use envelope::ApiResponse;
pub use error::{LibraryError, Result};
pub use models::*;
pub use pagination::{PageQuery, Paginated};
pub use store::{RentalStore, OWNER_EMAIL, OWNER_UID};
