//! # Core Configuration Module
//!
//! Provides configuration management for the RentPro client core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds all necessary dependencies and settings for the core.
//! It enforces fail-fast validation so a misconfigured host fails at startup
//! rather than on the first request.
//!
//! ## Dependencies
//!
//! - `SettingsStore` - Required for auth token persistence (desktop default: SQLite)
//! - `HttpClient` - Required only when a backend is configured (desktop default: reqwest)
//! - `RealtimeTransport` - Required only when a backend is configured (desktop default: tungstenite)
//! - `Clock` - Optional, defaults to the system clock
//!
//! ## Usage
//!
//! ### From the environment
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//!
//! // RENTPRO_API_BASE_URL, RENTPRO_API_TIMEOUT_MS, RENTPRO_WS_URL,
//! // RENTPRO_ENV, RENTPRO_SETTINGS_PATH, RENTPRO_LOG
//! let config = CoreConfig::from_env()?;
//! ```
//!
//! ### Explicit configuration
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .api_base_url("https://api.rentpro.example/api")
//!     .api_timeout_ms(5_000)
//!     .http_client(Arc::new(MyHttpClient))
//!     .settings_store(Arc::new(MySettingsStore))
//!     .realtime_transport(Arc::new(MyTransport))
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // Zero timeouts are rejected
//! let config = CoreConfig::builder()
//!     .api_timeout_ms(0)
//!     .build()
//!     .expect("Should fail - invalid timeout");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{Clock, HttpClient, RealtimeTransport, SettingsStore, SystemClock};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const ENV_API_BASE_URL: &str = "RENTPRO_API_BASE_URL";
pub const ENV_API_TIMEOUT_MS: &str = "RENTPRO_API_TIMEOUT_MS";
pub const ENV_WS_URL: &str = "RENTPRO_WS_URL";
pub const ENV_ENVIRONMENT: &str = "RENTPRO_ENV";
pub const ENV_SETTINGS_PATH: &str = "RENTPRO_SETTINGS_PATH";
pub const ENV_LOG: &str = "RENTPRO_LOG";

pub const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_WS_URL: &str = "ws://localhost:3001";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Always served by the mock backend.
    Development,
    #[default]
    Production,
}

impl Environment {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(Error::Config(format!(
                "Unknown environment '{}'. Expected 'development' or 'production'.",
                other
            ))),
        }
    }
}

/// Fixed-budget retry with linear backoff.
///
/// After attempt `n` fails the caller waits `n × base_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the given (1-based) attempt failed.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// Artificial round-trip costs of the mock backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLatency {
    /// Most calls
    pub standard: Duration,
    /// Logout and token refresh
    pub quick: Duration,
    /// Document and file uploads
    pub upload: Duration,
    /// Data exports
    pub export: Duration,
}

impl Default for MockLatency {
    fn default() -> Self {
        Self {
            standard: Duration::from_millis(500),
            quick: Duration::from_millis(200),
            upload: Duration::from_millis(1000),
            export: Duration::from_millis(2000),
        }
    }
}

impl MockLatency {
    /// No artificial delay. Used by tests.
    pub fn none() -> Self {
        Self {
            standard: Duration::ZERO,
            quick: Duration::ZERO,
            upload: Duration::ZERO,
            export: Duration::ZERO,
        }
    }
}

/// Timer-driven synthetic update feed: every `interval`, emit one update
/// with the given `probability`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedSettings {
    pub interval: Duration,
    pub probability: f64,
}

impl FeedSettings {
    /// The mock backend's subscription feed.
    pub fn mock_backend() -> Self {
        Self {
            interval: Duration::from_secs(10),
            probability: 0.2,
        }
    }

    /// The real-time session's fallback feed.
    pub fn realtime_fallback() -> Self {
        Self {
            interval: Duration::from_secs(30),
            probability: 0.1,
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.interval.is_zero() {
            return Err(Error::Config(format!("{} interval must be greater than 0", name)));
        }
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(Error::Config(format!(
                "{} probability must be within [0, 1], got {}",
                name, self.probability
            )));
        }
        Ok(())
    }
}

/// Core configuration for the RentPro client core.
///
/// Use [`CoreConfigBuilder`] or [`CoreConfig::from_env`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Backend base address. `None` means every call goes to the mock backend.
    pub api_base_url: Option<String>,

    /// Per-request timeout on the network path
    pub api_timeout: Duration,

    /// Socket base address; sessions connect to `{ws_url}/ws/{userId}`
    pub ws_url: String,

    pub environment: Environment,

    pub retry_policy: RetryPolicy,

    /// Switch to the mock backend after the first network failure
    pub fallback_to_mock: bool,

    pub mock_latency: MockLatency,

    /// Mock backend subscription feed
    pub mock_feed: FeedSettings,

    /// Real-time fallback feed
    pub realtime_feed: FeedSettings,

    /// Keep-alive ping period on a live socket
    pub keep_alive_interval: Duration,

    /// Upper bound on opening and authenticating a live socket
    pub connect_timeout: Duration,

    /// Location of the settings database
    pub settings_path: PathBuf,

    /// Log filter override
    pub log_filter: Option<String>,

    /// HTTP client (required when a backend is configured)
    pub http_client: Option<Arc<dyn HttpClient>>,

    /// Durable settings storage (required)
    pub settings_store: Arc<dyn SettingsStore>,

    /// Socket transport (required when a backend is configured)
    pub realtime_transport: Option<Arc<dyn RealtimeTransport>>,

    pub clock: Arc<dyn Clock>,
}

impl fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_timeout", &self.api_timeout)
            .field("ws_url", &self.ws_url)
            .field("environment", &self.environment)
            .field("retry_policy", &self.retry_policy)
            .field("fallback_to_mock", &self.fallback_to_mock)
            .field("mock_latency", &self.mock_latency)
            .field("mock_feed", &self.mock_feed)
            .field("realtime_feed", &self.realtime_feed)
            .field("keep_alive_interval", &self.keep_alive_interval)
            .field("connect_timeout", &self.connect_timeout)
            .field("settings_path", &self.settings_path)
            .field(
                "http_client",
                &self.http_client.as_ref().map(|_| "HttpClient { ... }"),
            )
            .field("settings_store", &"SettingsStore { ... }")
            .field(
                "realtime_transport",
                &self
                    .realtime_transport
                    .as_ref()
                    .map(|_| "RealtimeTransport { ... }"),
            )
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Builds a configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        CoreConfigBuilder::from_env()?.build()
    }

    /// Whether every call should be answered by the mock backend from the
    /// start of the session.
    pub fn starts_in_mock_mode(&self) -> bool {
        self.api_base_url.is_none() || self.environment == Environment::Development
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Timeouts and intervals are non-zero
    /// - At least one attempt is allowed
    /// - URLs are non-empty and parse
    /// - Feed probabilities are within [0, 1]
    /// - Network bridges are present when a backend is in use
    pub fn validate(&self) -> Result<()> {
        if self.api_timeout.is_zero() {
            return Err(Error::Config(
                "API timeout must be greater than 0 ms".to_string(),
            ));
        }

        if self.retry_policy.max_attempts == 0 {
            return Err(Error::Config(
                "Retry policy must allow at least one attempt".to_string(),
            ));
        }

        if let Some(base) = &self.api_base_url {
            validate_url("API base URL", base, &["http", "https"])?;
        }
        validate_url("WebSocket URL", &self.ws_url, &["ws", "wss"])?;

        if self.keep_alive_interval.is_zero() {
            return Err(Error::Config(
                "Keep-alive interval must be greater than 0".to_string(),
            ));
        }

        if self.connect_timeout.is_zero() {
            return Err(Error::Config(
                "Connect timeout must be greater than 0".to_string(),
            ));
        }

        self.mock_feed.validate("Mock feed")?;
        self.realtime_feed.validate("Realtime feed")?;

        if !self.starts_in_mock_mode() {
            if self.http_client.is_none() {
                return Err(http_client_missing_error());
            }
            if self.realtime_transport.is_none() {
                return Err(realtime_transport_missing_error());
            }
        }

        Ok(())
    }
}

fn validate_url(name: &str, value: &str, schemes: &[&str]) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{} cannot be empty", name)));
    }
    let parsed = url::Url::parse(value)
        .map_err(|e| Error::Config(format!("{} '{}' is invalid: {}", name, value, e)))?;
    if !schemes.contains(&parsed.scheme()) {
        return Err(Error::Config(format!(
            "{} must use one of {:?}, got '{}'",
            name,
            schemes,
            parsed.scheme()
        )));
    }
    Ok(())
}

fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "An HttpClient is required when a backend base URL is configured. \
                 Desktop: enable the 'desktop-shims' feature to use ReqwestHttpClient. \
                 Otherwise inject a host implementation or unset RENTPRO_API_BASE_URL."
            .to_string(),
    }
}

fn realtime_transport_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "RealtimeTransport".to_string(),
        message: "A RealtimeTransport is required for live updates when a backend is configured. \
                 Desktop: enable the 'desktop-shims' feature to use TungsteniteTransport."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn settings_store_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "SettingsStore".to_string(),
        message: "SettingsStore implementation is required for auth token persistence. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default SqliteSettingsStore. \
                 Web: inject a localStorage-based settings store."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Option<Arc<dyn HttpClient>>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(timeout)
        .map_err(|e| Error::Internal(format!("Failed to initialize default HttpClient: {}", e)))?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(Some(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Option<Arc<dyn HttpClient>>> {
    Ok(None)
}

#[cfg(feature = "desktop-shims")]
fn provide_default_realtime_transport() -> Option<Arc<dyn RealtimeTransport>> {
    use bridge_desktop::TungsteniteTransport;

    let transport: Arc<dyn RealtimeTransport> = Arc::new(TungsteniteTransport::new());
    Some(transport)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_realtime_transport() -> Option<Arc<dyn RealtimeTransport>> {
    None
}

#[cfg(feature = "desktop-shims")]
fn provide_default_settings_store(settings_path: &Path) -> Result<Arc<dyn SettingsStore>> {
    use bridge_desktop::SqliteSettingsStore;
    use std::thread;
    use tokio::runtime::{Handle, Runtime};

    let init_store = |path: PathBuf| -> Result<_> {
        let runtime = Runtime::new().map_err(|e| {
            Error::Internal(format!(
                "Failed to create Tokio runtime for default settings store: {}",
                e
            ))
        })?;

        runtime
            .block_on(SqliteSettingsStore::new(path))
            .map_err(|e| {
                Error::Internal(format!("Failed to initialize default SettingsStore: {}", e))
            })
    };

    // block_on panics inside a runtime, so hop to a plain thread there
    let store = match Handle::try_current() {
        Ok(_) => {
            let path = settings_path.to_path_buf();
            thread::spawn(move || init_store(path))
                .join()
                .map_err(|_| {
                    Error::Internal(
                        "Worker thread panicked while creating default SettingsStore".to_string(),
                    )
                })??
        }
        Err(_) => init_store(settings_path.to_path_buf())?,
    };

    let store: Arc<dyn SettingsStore> = Arc::new(store);
    Ok(store)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_settings_store(_settings_path: &Path) -> Result<Arc<dyn SettingsStore>> {
    Err(settings_store_missing_error())
}

fn default_settings_path() -> PathBuf {
    #[cfg(feature = "desktop-shims")]
    {
        bridge_desktop::SqliteSettingsStore::default_path()
    }

    #[cfg(not(feature = "desktop-shims"))]
    {
        PathBuf::from("rentpro-settings.db")
    }
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Use this builder to incrementally set configuration options and then
/// call [`build()`](CoreConfigBuilder::build) to create the final config.
#[derive(Default)]
pub struct CoreConfigBuilder {
    api_base_url: Option<String>,
    api_timeout_ms: Option<u64>,
    ws_url: Option<String>,
    environment: Option<Environment>,
    retry_policy: Option<RetryPolicy>,
    fallback_to_mock: Option<bool>,
    mock_latency: Option<MockLatency>,
    mock_feed: Option<FeedSettings>,
    realtime_feed: Option<FeedSettings>,
    keep_alive_interval: Option<Duration>,
    connect_timeout: Option<Duration>,
    settings_path: Option<PathBuf>,
    log_filter: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    settings_store: Option<Arc<dyn SettingsStore>>,
    realtime_transport: Option<Arc<dyn RealtimeTransport>>,
    clock: Option<Arc<dyn Clock>>,
}

impl CoreConfigBuilder {
    /// Seeds a builder from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Seeds a builder from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    ///
    /// ```
    /// use core_runtime::config::CoreConfigBuilder;
    ///
    /// let builder = CoreConfigBuilder::from_env_with(|key| match key {
    ///     "RENTPRO_ENV" => Some("development".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// ```
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut builder = Self::default();

        if let Some(url) = read(ENV_API_BASE_URL) {
            builder = builder.api_base_url(url);
        }

        if let Some(raw) = read(ENV_API_TIMEOUT_MS) {
            let ms = raw.trim().parse::<u64>().map_err(|e| {
                Error::Config(format!("{} must be a number of milliseconds: {}", ENV_API_TIMEOUT_MS, e))
            })?;
            builder = builder.api_timeout_ms(ms);
        }

        if let Some(url) = read(ENV_WS_URL) {
            builder = builder.ws_url(url);
        }

        if let Some(env) = read(ENV_ENVIRONMENT) {
            builder = builder.environment(Environment::parse(&env)?);
        }

        if let Some(path) = read(ENV_SETTINGS_PATH) {
            builder = builder.settings_path(path);
        }

        if let Some(filter) = read(ENV_LOG) {
            builder = builder.log_filter(filter);
        }

        Ok(builder)
    }

    /// Sets the backend base address (e.g. `https://api.example.com/api`).
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    /// Sets the request timeout in milliseconds.
    ///
    /// Default: 10000
    pub fn api_timeout_ms(mut self, ms: u64) -> Self {
        self.api_timeout_ms = Some(ms);
        self
    }

    /// Sets the socket base address.
    ///
    /// Default: `ws://localhost:3001`
    pub fn ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Enables or disables the switch to the mock backend after a network
    /// failure. With fallback disabled, failures reach the retry wrapper.
    ///
    /// Default: true
    pub fn fallback_to_mock(mut self, enabled: bool) -> Self {
        self.fallback_to_mock = Some(enabled);
        self
    }

    pub fn mock_latency(mut self, latency: MockLatency) -> Self {
        self.mock_latency = Some(latency);
        self
    }

    pub fn mock_feed(mut self, feed: FeedSettings) -> Self {
        self.mock_feed = Some(feed);
        self
    }

    pub fn realtime_feed(mut self, feed: FeedSettings) -> Self {
        self.realtime_feed = Some(feed);
        self
    }

    /// Default: 30 s
    pub fn keep_alive_interval(mut self, interval: Duration) -> Self {
        self.keep_alive_interval = Some(interval);
        self
    }

    /// Default: 10 s
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn settings_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) will be used when
    /// the `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the settings store implementation (required).
    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    pub fn realtime_transport(mut self, transport: Arc<dyn RealtimeTransport>) -> Self {
        self.realtime_transport = Some(transport);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// Missing bridges are filled with desktop defaults when the
    /// `desktop-shims` feature is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The settings store is missing and no default is available
    /// - Network bridges are missing while a backend is configured
    /// - Configuration values are invalid
    pub fn build(self) -> Result<CoreConfig> {
        let api_timeout = Duration::from_millis(self.api_timeout_ms.unwrap_or(DEFAULT_API_TIMEOUT_MS));
        let settings_path = self.settings_path.unwrap_or_else(default_settings_path);

        let http_client = match self.http_client {
            Some(client) => Some(client),
            None if !api_timeout.is_zero() => provide_default_http_client(api_timeout)?,
            None => None,
        };

        let realtime_transport = self
            .realtime_transport
            .or_else(provide_default_realtime_transport);

        let config = CoreConfig {
            api_base_url: self.api_base_url,
            api_timeout,
            ws_url: self.ws_url.unwrap_or_else(|| DEFAULT_WS_URL.to_string()),
            environment: self.environment.unwrap_or_default(),
            retry_policy: self.retry_policy.unwrap_or_default(),
            fallback_to_mock: self.fallback_to_mock.unwrap_or(true),
            mock_latency: self.mock_latency.unwrap_or_default(),
            mock_feed: self.mock_feed.unwrap_or_else(FeedSettings::mock_backend),
            realtime_feed: self
                .realtime_feed
                .unwrap_or_else(FeedSettings::realtime_fallback),
            keep_alive_interval: self
                .keep_alive_interval
                .unwrap_or(Duration::from_secs(30)),
            connect_timeout: self
                .connect_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
            log_filter: self.log_filter,
            http_client,
            settings_store: match self.settings_store {
                Some(store) => store,
                None => {
                    // Cheap checks first so a bad timeout is reported before
                    // the default store touches the disk.
                    if api_timeout.is_zero() {
                        return Err(Error::Config(
                            "API timeout must be greater than 0 ms".to_string(),
                        ));
                    }
                    provide_default_settings_store(&settings_path)?
                }
            },
            settings_path,
            realtime_transport,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::{BridgeError, HttpRequest, HttpResponse};
    use std::collections::HashMap;

    struct MockSettingsStore;

    #[async_trait]
    impl SettingsStore for MockSettingsStore {
        async fn set_string(&self, _key: &str, _value: &str) -> std::result::Result<(), BridgeError> {
            Ok(())
        }

        async fn get_string(&self, _key: &str) -> std::result::Result<Option<String>, BridgeError> {
            Ok(None)
        }

        async fn delete(&self, _key: &str) -> std::result::Result<(), BridgeError> {
            Ok(())
        }

        async fn has_key(&self, _key: &str) -> std::result::Result<bool, BridgeError> {
            Ok(false)
        }

        async fn list_keys(&self) -> std::result::Result<Vec<String>, BridgeError> {
            Ok(Vec::new())
        }

        async fn clear_all(&self) -> std::result::Result<(), BridgeError> {
            Ok(())
        }
    }

    struct NoopHttpClient;

    #[async_trait]
    impl HttpClient for NoopHttpClient {
        async fn execute(
            &self,
            _request: HttpRequest,
        ) -> std::result::Result<HttpResponse, BridgeError> {
            Err(BridgeError::NotAvailable("noop".to_string()))
        }
    }

    struct NoopTransport;

    #[async_trait]
    impl RealtimeTransport for NoopTransport {
        async fn connect(
            &self,
            _url: &str,
        ) -> std::result::Result<Box<dyn bridge_traits::RealtimeConnection>, BridgeError> {
            Err(BridgeError::NotAvailable("noop".to_string()))
        }
    }

    fn base() -> CoreConfigBuilder {
        CoreConfig::builder().settings_store(Arc::new(MockSettingsStore))
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = base().build().unwrap();

        assert_eq!(config.api_base_url, None);
        assert_eq!(config.api_timeout, Duration::from_millis(10_000));
        assert_eq!(config.ws_url, "ws://localhost:3001");
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.retry_policy, RetryPolicy::default());
        assert!(config.fallback_to_mock);
        assert_eq!(config.mock_feed, FeedSettings::mock_backend());
        assert_eq!(config.realtime_feed, FeedSettings::realtime_fallback());
        assert_eq!(config.keep_alive_interval, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.starts_in_mock_mode());
    }

    #[test]
    fn test_retry_delay_is_linear() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_after(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_after(3), Duration::from_millis(3000));
    }

    #[test]
    fn test_mock_mode_selection() {
        let without_backend = base().build().unwrap();
        assert!(without_backend.starts_in_mock_mode());

        let development = base()
            .api_base_url("https://api.example.com/api")
            .environment(Environment::Development)
            .http_client(Arc::new(NoopHttpClient))
            .realtime_transport(Arc::new(NoopTransport))
            .build()
            .unwrap();
        assert!(development.starts_in_mock_mode());

        let production = base()
            .api_base_url("https://api.example.com/api/")
            .http_client(Arc::new(NoopHttpClient))
            .realtime_transport(Arc::new(NoopTransport))
            .build()
            .unwrap();
        assert!(!production.starts_in_mock_mode());
        assert_eq!(
            production.api_base_url.as_deref(),
            Some("https://api.example.com/api")
        );
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let err = base().api_timeout_ms(0).build().unwrap_err();
        assert!(err.to_string().contains("timeout must be greater than 0"));
    }

    #[test]
    fn test_validate_rejects_zero_connect_timeout() {
        let err = base().connect_timeout(Duration::ZERO).build().unwrap_err();
        assert!(err.to_string().contains("Connect timeout must be greater than 0"));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let err = base()
            .retry_policy(RetryPolicy {
                max_attempts: 0,
                base_delay: Duration::from_millis(1000),
            })
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("at least one attempt"));
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let err = base().ws_url("").build().unwrap_err();
        assert!(err.to_string().contains("WebSocket URL cannot be empty"));

        let err = base().ws_url("http://localhost:3001").build().unwrap_err();
        assert!(err.to_string().contains("WebSocket URL must use"));
    }

    #[test]
    fn test_validate_rejects_probability_out_of_range() {
        let err = base()
            .mock_feed(FeedSettings {
                interval: Duration::from_secs(10),
                probability: 1.5,
            })
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("probability must be within [0, 1]"));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_network_mode_requires_http_client() {
        let err = base()
            .api_base_url("https://api.example.com/api")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::CapabilityMissing { ref capability, .. } if capability == "HttpClient"));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_builder_requires_settings_store() {
        let err = CoreConfig::builder().build().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("SettingsStore"));
        assert!(msg.contains("auth token persistence"));
    }

    #[test]
    fn test_from_env_reads_all_variables() {
        let builder = CoreConfigBuilder::from_env_with(env(&[
            (ENV_API_BASE_URL, "https://api.example.com/api"),
            (ENV_API_TIMEOUT_MS, "2500"),
            (ENV_WS_URL, "wss://rt.example.com"),
            (ENV_ENVIRONMENT, "production"),
            (ENV_SETTINGS_PATH, "/tmp/rentpro/settings.db"),
            (ENV_LOG, "core_api=debug"),
        ]))
        .unwrap();

        let config = builder
            .settings_store(Arc::new(MockSettingsStore))
            .http_client(Arc::new(NoopHttpClient))
            .realtime_transport(Arc::new(NoopTransport))
            .build()
            .unwrap();

        assert_eq!(config.api_base_url.as_deref(), Some("https://api.example.com/api"));
        assert_eq!(config.api_timeout, Duration::from_millis(2500));
        assert_eq!(config.ws_url, "wss://rt.example.com");
        assert_eq!(config.settings_path, PathBuf::from("/tmp/rentpro/settings.db"));
        assert_eq!(config.log_filter.as_deref(), Some("core_api=debug"));
        assert!(!config.starts_in_mock_mode());
    }

    #[test]
    fn test_from_env_development_forces_mock() {
        let config = CoreConfigBuilder::from_env_with(env(&[
            (ENV_API_BASE_URL, "https://api.example.com/api"),
            (ENV_ENVIRONMENT, "development"),
        ]))
        .unwrap()
        .settings_store(Arc::new(MockSettingsStore))
        .build()
        .unwrap();

        assert!(config.starts_in_mock_mode());
    }

    #[test]
    fn test_from_env_treats_empty_as_unset() {
        let config = CoreConfigBuilder::from_env_with(env(&[(ENV_API_BASE_URL, "  ")]))
            .unwrap()
            .settings_store(Arc::new(MockSettingsStore))
            .build()
            .unwrap();

        assert_eq!(config.api_base_url, None);
    }

    #[test]
    fn test_from_env_rejects_bad_values() {
        let err = CoreConfigBuilder::from_env_with(env(&[(ENV_API_TIMEOUT_MS, "soon")]))
            .err()
            .unwrap();
        assert!(err.to_string().contains(ENV_API_TIMEOUT_MS));

        let err = CoreConfigBuilder::from_env_with(env(&[(ENV_ENVIRONMENT, "staging")]))
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unknown environment"));
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_build_with_desktop_defaults() {
        let base_dir = std::env::temp_dir().join(format!("rentpro-config-{}", std::process::id()));
        let path = base_dir.join("settings.db");

        let config = CoreConfig::builder()
            .settings_path(&path)
            .api_base_url("http://localhost:5000/api")
            .build()
            .expect("desktop defaults should succeed");

        assert!(config.http_client.is_some());
        assert!(config.realtime_transport.is_some());

        let settings = config.settings_store.clone();
        let rt = tokio::runtime::Runtime::new().expect("runtime");
        rt.block_on(async {
            settings.set_string("auth_token", "t").await.unwrap();
            assert_eq!(settings.get_string("auth_token").await.unwrap().as_deref(), Some("t"));
        });

        drop(config);
        let _ = std::fs::remove_dir_all(&base_dir);
    }
}
