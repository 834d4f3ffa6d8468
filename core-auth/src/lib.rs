//! # Authentication Module
//!
//! Session credentials for the RentPro client core.
//!
//! ## Overview
//!
//! The backend (or the mock backend) issues an opaque bearer token on login.
//! This crate owns the single durable copy of that token and the small set of
//! types that describe who is signed in.
//!
//! ## Features
//!
//! - Token persistence through the host `SettingsStore` (key `auth_token`)
//! - Tenant and owner credential types
//! - User roles shared by the API client and the real-time session

pub mod error;
pub mod token_store;
pub mod types;

pub use error::{AuthError, Result};
pub use token_store::{TokenStore, AUTH_TOKEN_KEY};
pub use types::{OwnerCredentials, TenantCredentials, UserRole};
