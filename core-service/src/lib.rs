//! Core service façade and bootstrap helpers.
//!
//! This crate wires the configured bridges (HTTP, settings, real-time socket,
//! clock) into the client core: one [`EventBus`], one [`TokenStore`], one
//! in-memory [`RentalStore`] behind the mock backend, the [`ApiClient`], and
//! at most one real-time session at a time. Desktop apps enable the
//! `desktop-shims` feature so missing bridges default to `bridge-desktop`.
//!
//! ```no_run
//! use core_auth::TenantCredentials;
//! use core_service::CoreService;
//!
//! # async fn example() -> core_service::Result<()> {
//! let core = CoreService::bootstrap()?;
//! let mut events = core.subscribe();
//!
//! let login = core
//!     .sign_in_tenant(&TenantCredentials::new("101", "1234-5678-9012"))
//!     .await?;
//! assert!(login.success);
//!
//! while let Ok(event) = events.recv().await {
//!     println!("{}", event.description());
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;

pub use error::{CoreError, Result};

pub use core_api::ApiClient;
pub use core_realtime::{RealtimeHandle, Viewer};
pub use core_runtime::{ConnectionState, CoreConfig, CoreEvent, EventBus};

use core_auth::{OwnerCredentials, TenantCredentials, TokenStore};
use core_library::{ApiResponse, AuthenticatedUser, RentalStore};
use core_mock::MockBackend;
use core_realtime::RealtimeSession;
use core_runtime::events::{Receiver, DEFAULT_EVENT_BUFFER_SIZE};
use core_runtime::logging::{init_logging, LoggingConfig};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Primary façade exposed to host applications.
pub struct CoreService {
    config: CoreConfig,
    events: EventBus,
    tokens: TokenStore,
    store: Arc<RentalStore>,
    api: Arc<ApiClient>,
    realtime: Mutex<Option<RealtimeHandle>>,
}

impl CoreService {
    /// Builds the core from a validated configuration.
    ///
    /// Must be called inside a tokio runtime only if real-time sessions will
    /// be started; construction itself spawns nothing.
    pub fn new(config: CoreConfig) -> Result<Self> {
        config.validate()?;

        let events = EventBus::new(DEFAULT_EVENT_BUFFER_SIZE);
        let tokens = TokenStore::new(config.settings_store.clone());
        let store = Arc::new(RentalStore::seeded_with_clock(config.clock.clone()));
        let mock = MockBackend::new(
            store.clone(),
            config.mock_latency,
            config.mock_feed,
            config.clock.clone(),
        );
        let api = Arc::new(ApiClient::new(&config, tokens.clone(), mock, events.clone()));

        info!(
            environment = ?config.environment,
            mock_mode = api.is_mock_mode(),
            "Core service initialized"
        );

        Ok(Self {
            config,
            events,
            tokens,
            store,
            api,
            realtime: Mutex::new(None),
        })
    }

    /// Reads the configuration from the environment, installs logging and
    /// builds the core.
    pub fn bootstrap() -> Result<Self> {
        let config = CoreConfig::from_env()?;

        let mut logging = LoggingConfig::default();
        if let Some(filter) = &config.log_filter {
            logging = logging.with_filter(filter.clone());
        }
        init_logging(logging).map_err(|e| CoreError::InitializationFailed(e.to_string()))?;

        Self::new(config)
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Shared handle to the API client for hosts that move it into tasks.
    pub fn api_handle(&self) -> Arc<ApiClient> {
        Arc::clone(&self.api)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.events.subscribe()
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// The in-memory records the mock backend serves.
    pub fn store(&self) -> &Arc<RentalStore> {
        &self.store
    }

    /// Signs a tenant in and, on success, starts their real-time session.
    #[instrument(skip_all, fields(room_number = %credentials.room_number))]
    pub async fn sign_in_tenant(
        &self,
        credentials: &TenantCredentials,
    ) -> Result<ApiResponse<AuthenticatedUser>> {
        let response = self.api.login(credentials).await?;
        self.after_sign_in(&response).await;
        Ok(response)
    }

    /// Signs the owner in and, on success, starts their real-time session.
    #[instrument(skip_all)]
    pub async fn sign_in_owner(
        &self,
        credentials: &OwnerCredentials,
    ) -> Result<ApiResponse<AuthenticatedUser>> {
        let response = self.api.login_owner(credentials).await?;
        self.after_sign_in(&response).await;
        Ok(response)
    }

    /// Ends the real-time session, then logs out. The stored token is
    /// cleared whatever the backend answers.
    pub async fn sign_out(&self) -> Result<ApiResponse<()>> {
        self.stop_realtime().await;
        Ok(self.api.logout().await?)
    }

    /// Starts a real-time session for `viewer`, replacing any running one.
    ///
    /// The session starts on the synthetic feed when the API client is
    /// already in mock mode.
    pub async fn start_realtime(&self, viewer: Viewer) -> ConnectionState {
        let mut slot = self.realtime.lock().await;
        if let Some(previous) = slot.take() {
            debug!("Replacing running real-time session");
            previous.shutdown().await;
        }

        let session = RealtimeSession::new(&self.config, self.tokens.clone(), self.events.clone());
        let handle = session.start(viewer, self.api.is_mock_mode());
        let state = handle.state();
        *slot = Some(handle);
        state
    }

    /// Shuts the running session down, if any.
    pub async fn stop_realtime(&self) {
        if let Some(handle) = self.realtime.lock().await.take() {
            handle.shutdown().await;
        }
    }

    pub async fn realtime_state(&self) -> ConnectionState {
        self.realtime
            .lock()
            .await
            .as_ref()
            .map_or(ConnectionState::Disconnected, RealtimeHandle::state)
    }

    /// A receiver over the running session's state, if one is running.
    pub async fn watch_realtime(&self) -> Option<tokio::sync::watch::Receiver<ConnectionState>> {
        self.realtime
            .lock()
            .await
            .as_ref()
            .map(RealtimeHandle::watch_state)
    }

    pub async fn is_realtime_connected(&self) -> bool {
        self.realtime
            .lock()
            .await
            .as_ref()
            .is_some_and(RealtimeHandle::is_connected)
    }

    /// Forwards host visibility changes to the running session.
    pub async fn visibility_changed(&self, visible: bool) {
        if let Some(handle) = self.realtime.lock().await.as_ref() {
            handle.visibility_changed(visible);
        }
    }

    async fn after_sign_in(&self, response: &ApiResponse<AuthenticatedUser>) {
        if let Some(authenticated) = response.data.as_ref().filter(|_| response.success) {
            let viewer = Viewer::new(authenticated.user.uid.clone(), authenticated.user.role);
            self.start_realtime(viewer).await;
        }
    }
}

impl std::fmt::Debug for CoreService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreService")
            .field("environment", &self.config.environment)
            .field("api", &self.api)
            .finish()
    }
}
