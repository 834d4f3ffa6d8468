//! Auth Token Storage
//!
//! Persists the bearer token issued at login through the host's
//! `SettingsStore`. There is exactly one durable slot: signing in overwrites
//! it and signing out clears it.
//!
//! ## Example
//!
//! ```no_run
//! use core_auth::TokenStore;
//! use std::sync::Arc;
//! # use bridge_traits::storage::SettingsStore;
//! # async fn example(settings: Arc<dyn SettingsStore>) -> core_auth::Result<()> {
//! let tokens = TokenStore::new(settings);
//!
//! tokens.save("mock-token-tenant-101").await?;
//! assert_eq!(tokens.load().await?.as_deref(), Some("mock-token-tenant-101"));
//! tokens.clear().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use bridge_traits::storage::SettingsStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Settings key holding the current bearer token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Durable storage for the session's bearer token.
///
/// Token values are never logged.
#[derive(Clone)]
pub struct TokenStore {
    settings: Arc<dyn SettingsStore>,
}

impl TokenStore {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        debug!("Initializing TokenStore");
        Self { settings }
    }

    /// Stores the token, replacing any previous one.
    pub async fn save(&self, token: &str) -> Result<()> {
        self.settings
            .set_string(AUTH_TOKEN_KEY, token)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to persist auth token");
                AuthError::StorageUnavailable(e.to_string())
            })?;

        info!("Auth token stored");
        Ok(())
    }

    /// Returns the stored token, if any. Empty values count as absent.
    pub async fn load(&self) -> Result<Option<String>> {
        let token = self
            .settings
            .get_string(AUTH_TOKEN_KEY)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to read auth token");
                AuthError::StorageUnavailable(e.to_string())
            })?;

        Ok(token.filter(|t| !t.is_empty()))
    }

    /// Removes the stored token. Idempotent.
    pub async fn clear(&self) -> Result<()> {
        self.settings.delete(AUTH_TOKEN_KEY).await.map_err(|e| {
            warn!(error = %e, "Failed to remove auth token");
            AuthError::StorageUnavailable(e.to_string())
        })?;

        info!("Auth token cleared");
        Ok(())
    }

    pub async fn has_token(&self) -> Result<bool> {
        Ok(self.load().await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_desktop::SqliteSettingsStore;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    async fn sqlite_store() -> TokenStore {
        let settings = SqliteSettingsStore::in_memory()
            .await
            .expect("in-memory settings store");
        TokenStore::new(Arc::new(settings))
    }

    /// Settings store whose every call fails.
    struct BrokenSettingsStore;

    #[async_trait::async_trait]
    impl SettingsStore for BrokenSettingsStore {
        async fn set_string(&self, _key: &str, _value: &str) -> BridgeResult<()> {
            Err(BridgeError::Storage("disk full".to_string()))
        }

        async fn get_string(&self, _key: &str) -> BridgeResult<Option<String>> {
            Err(BridgeError::Storage("locked".to_string()))
        }

        async fn delete(&self, _key: &str) -> BridgeResult<()> {
            Err(BridgeError::Storage("locked".to_string()))
        }

        async fn has_key(&self, _key: &str) -> BridgeResult<bool> {
            unimplemented!()
        }

        async fn list_keys(&self) -> BridgeResult<Vec<String>> {
            unimplemented!()
        }

        async fn clear_all(&self) -> BridgeResult<()> {
            unimplemented!()
        }
    }

    /// Records raw writes so the storage key can be asserted.
    #[derive(Default)]
    struct RecordingSettingsStore {
        values: Mutex<HashMap<String, String>>,
    }

    #[async_trait::async_trait]
    impl SettingsStore for RecordingSettingsStore {
        async fn set_string(&self, key: &str, value: &str) -> BridgeResult<()> {
            self.values
                .lock()
                .await
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn get_string(&self, key: &str) -> BridgeResult<Option<String>> {
            Ok(self.values.lock().await.get(key).cloned())
        }

        async fn delete(&self, key: &str) -> BridgeResult<()> {
            self.values.lock().await.remove(key);
            Ok(())
        }

        async fn has_key(&self, key: &str) -> BridgeResult<bool> {
            Ok(self.values.lock().await.contains_key(key))
        }

        async fn list_keys(&self) -> BridgeResult<Vec<String>> {
            Ok(self.values.lock().await.keys().cloned().collect())
        }

        async fn clear_all(&self) -> BridgeResult<()> {
            self.values.lock().await.clear();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_save_and_load_token() {
        let tokens = sqlite_store().await;

        tokens.save("mock-token-tenant-101").await.unwrap();

        assert_eq!(
            tokens.load().await.unwrap().as_deref(),
            Some("mock-token-tenant-101")
        );
        assert!(tokens.has_token().await.unwrap());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_token() {
        let tokens = sqlite_store().await;

        tokens.save("mock-token-tenant-101").await.unwrap();
        tokens.save("mock-token-owner-1").await.unwrap();

        assert_eq!(
            tokens.load().await.unwrap().as_deref(),
            Some("mock-token-owner-1")
        );
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let tokens = sqlite_store().await;

        tokens.save("mock-token-owner-1").await.unwrap();
        tokens.clear().await.unwrap();
        tokens.clear().await.unwrap();

        assert_eq!(tokens.load().await.unwrap(), None);
        assert!(!tokens.has_token().await.unwrap());
    }

    #[tokio::test]
    async fn test_uses_single_durable_key() {
        let settings = Arc::new(RecordingSettingsStore::default());
        let tokens = TokenStore::new(settings.clone());

        tokens.save("t").await.unwrap();

        let keys = settings.list_keys().await.unwrap();
        assert_eq!(keys, vec![AUTH_TOKEN_KEY.to_string()]);
    }

    #[tokio::test]
    async fn test_empty_token_counts_as_absent() {
        let settings = Arc::new(RecordingSettingsStore::default());
        settings.set_string(AUTH_TOKEN_KEY, "").await.unwrap();

        let tokens = TokenStore::new(settings);
        assert_eq!(tokens.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_storage_failures_are_reported() {
        let tokens = TokenStore::new(Arc::new(BrokenSettingsStore));

        assert!(matches!(
            tokens.save("t").await,
            Err(AuthError::StorageUnavailable(msg)) if msg.contains("disk full")
        ));
        assert!(matches!(
            tokens.load().await,
            Err(AuthError::StorageUnavailable(_))
        ));
        assert!(matches!(
            tokens.clear().await,
            Err(AuthError::StorageUnavailable(_))
        ));
    }
}
