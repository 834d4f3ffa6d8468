//! Durable Key-Value Storage Abstraction
//!
//! The client core keeps very little on the host: the auth token and the
//! odd string preference. Everything goes through [`SettingsStore`].

use async_trait::async_trait;

use crate::error::Result;

/// Key-value settings storage trait
///
/// Abstracts platform-specific durable storage:
/// - Desktop: SQLite-backed key-value table
/// - Web: localStorage
///
/// Values survive process restarts. Implementations must not log values,
/// since the auth token is stored here.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::SettingsStore;
///
/// async fn remember_token(store: &dyn SettingsStore, token: &str) -> Result<()> {
///     store.set_string("auth_token", token).await
/// }
/// ```
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Store a string value
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve a string value
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Delete a setting. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a setting exists
    async fn has_key(&self, key: &str) -> Result<bool>;

    /// List all setting keys
    async fn list_keys(&self) -> Result<Vec<String>>;

    /// Clear all settings
    async fn clear_all(&self) -> Result<()>;
}
