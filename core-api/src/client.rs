//! Retrying API client with mock fallback

use crate::command::{split_route, ApiCommand, Endpoint, RouteError};
use crate::dispatch::{dispatch, MOCK_API_ERROR};
use crate::error::{ApiError, Result};
use crate::updates::subscribe_live;
use bridge_traits::{HttpClient, HttpMethod, HttpRequest, RealtimeTransport};
use core_auth::{OwnerCredentials, TenantCredentials, TokenStore};
use core_library::{
    ApiResponse, AuthenticatedUser, BulkNotification, DashboardStats, DocumentLink, ExportLink,
    FileUpload, NewNotification, NewPayment, NewRoom, NewServiceRequest, Notification,
    OccupancyAnalytics, PageQuery, Paginated, Payment, PaymentAnalytics, PaymentStatus,
    RefreshedToken, RevenueAnalytics, Room, RoomPatch, ServiceRequest, ServiceRequestStatus,
    TenantProfile, TenantProfilePatch, UploadedFile,
};
use core_mock::{MockBackend, PushUpdate, Subscription};
use core_runtime::config::{CoreConfig, RetryPolicy};
use core_runtime::events::{ApiEvent, AuthEvent, CoreEvent, EventBus};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// A call on its way out: either a typed command or a raw route.
enum Call<'a> {
    Command(&'a ApiCommand),
    Raw {
        method: HttpMethod,
        route: &'a str,
        body: Option<&'a Value>,
    },
}

impl Call<'_> {
    fn name(&self) -> &'static str {
        match self {
            Call::Command(command) => command.name(),
            Call::Raw { .. } => "request_raw",
        }
    }

    fn endpoint(&self) -> Result<Endpoint> {
        match self {
            Call::Command(command) => command.endpoint(),
            Call::Raw {
                method,
                route,
                body,
            } => {
                let (path, query) = split_route(route);
                Ok(Endpoint {
                    method: *method,
                    path: path.to_string(),
                    query,
                    body: body.cloned(),
                })
            }
        }
    }

    async fn mock(&self, backend: &MockBackend) -> ApiResponse<Value> {
        match self {
            Call::Command(command) => dispatch(backend, command).await,
            Call::Raw {
                method,
                route,
                body,
            } => match ApiCommand::from_route(*method, route, *body) {
                Ok(command) => dispatch(backend, &command).await,
                Err(RouteError::Unmatched) => {
                    warn!(method = %method, route, "No mock implementation for route");
                    ApiResponse::ok(Value::Array(Vec::new()))
                }
                Err(RouteError::Invalid(reason)) => {
                    error!(method = %method, route, reason = %reason, "Mock API error");
                    ApiResponse::fail(MOCK_API_ERROR)
                }
            },
        }
    }
}

/// One stable method per backend capability.
///
/// Calls go to the configured backend until the first network failure,
/// after which the client answers from the mock backend for the rest of
/// the session. Every public call runs under the configured
/// [`RetryPolicy`].
///
/// # Example
///
/// ```no_run
/// use core_api::ApiClient;
/// use core_auth::{TenantCredentials, TokenStore};
/// use core_mock::MockBackend;
/// use core_runtime::{CoreConfig, EventBus};
///
/// # async fn example(config: CoreConfig) -> core_api::Result<()> {
/// let client = ApiClient::new(
///     &config,
///     TokenStore::new(config.settings_store.clone()),
///     MockBackend::seeded(),
///     EventBus::new(100),
/// );
///
/// let response = client
///     .login(&TenantCredentials::new("101", "1234-5678-9012"))
///     .await?;
/// assert!(response.success);
/// # Ok(())
/// # }
/// ```
pub struct ApiClient {
    base_url: Option<String>,
    timeout: Duration,
    retry_policy: RetryPolicy,
    fallback_to_mock: bool,
    http_client: Option<Arc<dyn HttpClient>>,
    realtime_transport: Option<Arc<dyn RealtimeTransport>>,
    ws_url: String,
    connect_timeout: Duration,
    tokens: TokenStore,
    mock: MockBackend,
    events: EventBus,
    mock_mode: AtomicBool,
}

impl ApiClient {
    pub fn new(config: &CoreConfig, tokens: TokenStore, mock: MockBackend, events: EventBus) -> Self {
        let mock_mode = config.starts_in_mock_mode();
        if mock_mode {
            info!(environment = ?config.environment, "API client starting in mock mode");
        } else {
            info!(base_url = ?config.api_base_url, "API client using remote backend");
        }

        Self {
            base_url: config.api_base_url.clone(),
            timeout: config.api_timeout,
            retry_policy: config.retry_policy,
            fallback_to_mock: config.fallback_to_mock,
            http_client: config.http_client.clone(),
            realtime_transport: config.realtime_transport.clone(),
            ws_url: config.ws_url.clone(),
            connect_timeout: config.connect_timeout,
            tokens,
            mock,
            events,
            mock_mode: AtomicBool::new(mock_mode),
        }
    }

    /// Whether calls are currently answered by the mock backend.
    pub fn is_mock_mode(&self) -> bool {
        self.mock_mode.load(Ordering::SeqCst)
    }

    pub fn mock_backend(&self) -> &MockBackend {
        &self.mock
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.tokens
    }

    /// Streams server-pushed updates for `user_id` into `callback` until the
    /// returned handle is cancelled or dropped.
    ///
    /// In mock mode the mock backend's timer feed answers. Otherwise a plain
    /// socket is opened at `{ws_url}/ws/{user_id}`; it is not authenticated
    /// and does not reconnect. Must be called from within a tokio runtime.
    pub fn subscribe_to_updates<F>(&self, user_id: &str, callback: F) -> Subscription
    where
        F: Fn(PushUpdate) + Send + Sync + 'static,
    {
        if self.is_mock_mode() {
            debug!(user_id, "Subscribing to mock updates");
            return self.mock.subscribe_to_updates(user_id, callback);
        }

        match &self.realtime_transport {
            Some(transport) => subscribe_live(
                transport.clone(),
                &self.ws_url,
                self.connect_timeout,
                user_id,
                callback,
            ),
            None => {
                warn!(user_id, "No real-time transport configured, using mock updates");
                self.mock.subscribe_to_updates(user_id, callback)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Auth
    // -------------------------------------------------------------------------

    /// Tenant sign-in. The issued token is persisted on success.
    #[instrument(skip(self, credentials), fields(room_number = %credentials.room_number))]
    pub async fn login(
        &self,
        credentials: &TenantCredentials,
    ) -> Result<ApiResponse<AuthenticatedUser>> {
        let response = self.call(ApiCommand::Login(credentials.clone())).await?;
        self.remember_session(&response).await;
        Ok(response)
    }

    /// Owner sign-in. The issued token is persisted on success.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login_owner(
        &self,
        credentials: &OwnerCredentials,
    ) -> Result<ApiResponse<AuthenticatedUser>> {
        let response = self
            .call(ApiCommand::LoginOwner(credentials.clone()))
            .await?;
        self.remember_session(&response).await;
        Ok(response)
    }

    /// Ends the session. The stored token is removed whatever the backend
    /// answers.
    pub async fn logout(&self) -> Result<ApiResponse<()>> {
        let response = self.call_unit(ApiCommand::Logout).await;
        self.forget_session().await;
        response
    }

    pub async fn refresh_token(&self) -> Result<ApiResponse<RefreshedToken>> {
        let response: ApiResponse<RefreshedToken> = self.call(ApiCommand::RefreshToken).await?;

        if let Some(refreshed) = response.data.as_ref().filter(|_| response.success) {
            match self.tokens.save(&refreshed.token).await {
                Ok(()) => self.emit(CoreEvent::Auth(AuthEvent::TokenRefreshed)),
                Err(e) => self.emit(CoreEvent::Auth(AuthEvent::AuthError {
                    message: e.to_string(),
                    recoverable: true,
                })),
            }
        }

        Ok(response)
    }

    // -------------------------------------------------------------------------
    // Tenants
    // -------------------------------------------------------------------------

    pub async fn get_tenant_profile(&self, tenant_id: &str) -> Result<ApiResponse<TenantProfile>> {
        self.call(ApiCommand::GetTenantProfile {
            tenant_id: tenant_id.to_string(),
        })
        .await
    }

    pub async fn update_tenant_profile(
        &self,
        tenant_id: &str,
        patch: TenantProfilePatch,
    ) -> Result<ApiResponse<TenantProfile>> {
        self.call(ApiCommand::UpdateTenantProfile {
            tenant_id: tenant_id.to_string(),
            patch,
        })
        .await
    }

    pub async fn complete_tenant_onboarding(
        &self,
        tenant_id: &str,
        patch: TenantProfilePatch,
    ) -> Result<ApiResponse<TenantProfile>> {
        self.call(ApiCommand::CompleteTenantOnboarding {
            tenant_id: tenant_id.to_string(),
            patch,
        })
        .await
    }

    pub async fn upload_tenant_document(
        &self,
        tenant_id: &str,
        file: FileUpload,
        kind: &str,
    ) -> Result<ApiResponse<DocumentLink>> {
        self.call(ApiCommand::UploadTenantDocument {
            tenant_id: tenant_id.to_string(),
            file,
            kind: kind.to_string(),
        })
        .await
    }

    pub async fn get_all_tenants(
        &self,
        query: PageQuery,
    ) -> Result<ApiResponse<Paginated<TenantProfile>>> {
        self.call(ApiCommand::GetAllTenants(query)).await
    }

    pub async fn get_tenant_by_id(&self, tenant_id: &str) -> Result<ApiResponse<TenantProfile>> {
        self.call(ApiCommand::GetTenantById {
            tenant_id: tenant_id.to_string(),
        })
        .await
    }

    pub async fn update_tenant_by_owner(
        &self,
        tenant_id: &str,
        patch: TenantProfilePatch,
    ) -> Result<ApiResponse<TenantProfile>> {
        self.call(ApiCommand::UpdateTenantByOwner {
            tenant_id: tenant_id.to_string(),
            patch,
        })
        .await
    }

    pub async fn delete_tenant(&self, tenant_id: &str) -> Result<ApiResponse<()>> {
        self.call_unit(ApiCommand::DeleteTenant {
            tenant_id: tenant_id.to_string(),
        })
        .await
    }

    // -------------------------------------------------------------------------
    // Rooms
    // -------------------------------------------------------------------------

    pub async fn get_all_rooms(&self) -> Result<ApiResponse<Vec<Room>>> {
        self.call(ApiCommand::GetAllRooms).await
    }

    pub async fn get_room_by_id(&self, room_id: &str) -> Result<ApiResponse<Room>> {
        self.call(ApiCommand::GetRoomById {
            room_id: room_id.to_string(),
        })
        .await
    }

    pub async fn create_room(&self, room: NewRoom) -> Result<ApiResponse<Room>> {
        self.call(ApiCommand::CreateRoom(room)).await
    }

    pub async fn update_room(&self, room_id: &str, patch: RoomPatch) -> Result<ApiResponse<Room>> {
        self.call(ApiCommand::UpdateRoom {
            room_id: room_id.to_string(),
            patch,
        })
        .await
    }

    pub async fn delete_room(&self, room_id: &str) -> Result<ApiResponse<()>> {
        self.call_unit(ApiCommand::DeleteRoom {
            room_id: room_id.to_string(),
        })
        .await
    }

    pub async fn assign_tenant_to_room(
        &self,
        room_id: &str,
        tenant_id: &str,
    ) -> Result<ApiResponse<Room>> {
        self.call(ApiCommand::AssignTenantToRoom {
            room_id: room_id.to_string(),
            tenant_id: tenant_id.to_string(),
        })
        .await
    }

    pub async fn remove_tenant_from_room(&self, room_id: &str) -> Result<ApiResponse<Room>> {
        self.call(ApiCommand::RemoveTenantFromRoom {
            room_id: room_id.to_string(),
        })
        .await
    }

    // -------------------------------------------------------------------------
    // Payments
    // -------------------------------------------------------------------------

    pub async fn submit_payment(&self, payment: NewPayment) -> Result<ApiResponse<Payment>> {
        self.call(ApiCommand::SubmitPayment(payment)).await
    }

    pub async fn get_tenant_payments(&self, tenant_id: &str) -> Result<ApiResponse<Vec<Payment>>> {
        self.call(ApiCommand::GetTenantPayments {
            tenant_id: tenant_id.to_string(),
        })
        .await
    }

    pub async fn get_all_payments(&self, query: PageQuery) -> Result<ApiResponse<Paginated<Payment>>> {
        self.call(ApiCommand::GetAllPayments(query)).await
    }

    pub async fn update_payment_status(
        &self,
        payment_id: &str,
        status: PaymentStatus,
    ) -> Result<ApiResponse<Payment>> {
        self.call(ApiCommand::UpdatePaymentStatus {
            payment_id: payment_id.to_string(),
            status,
        })
        .await
    }

    pub async fn verify_payment(&self, payment_id: &str, verified: bool) -> Result<ApiResponse<Payment>> {
        self.call(ApiCommand::VerifyPayment {
            payment_id: payment_id.to_string(),
            verified,
        })
        .await
    }

    // -------------------------------------------------------------------------
    // Service requests
    // -------------------------------------------------------------------------

    pub async fn create_service_request(
        &self,
        request: NewServiceRequest,
    ) -> Result<ApiResponse<ServiceRequest>> {
        self.call(ApiCommand::CreateServiceRequest(request)).await
    }

    pub async fn get_tenant_service_requests(
        &self,
        tenant_id: &str,
    ) -> Result<ApiResponse<Vec<ServiceRequest>>> {
        self.call(ApiCommand::GetTenantServiceRequests {
            tenant_id: tenant_id.to_string(),
        })
        .await
    }

    pub async fn get_all_service_requests(
        &self,
        query: PageQuery,
    ) -> Result<ApiResponse<Paginated<ServiceRequest>>> {
        self.call(ApiCommand::GetAllServiceRequests(query)).await
    }

    pub async fn update_service_request_status(
        &self,
        request_id: &str,
        status: ServiceRequestStatus,
    ) -> Result<ApiResponse<ServiceRequest>> {
        self.call(ApiCommand::UpdateServiceRequestStatus {
            request_id: request_id.to_string(),
            status,
        })
        .await
    }

    pub async fn add_service_request_note(
        &self,
        request_id: &str,
        note: &str,
    ) -> Result<ApiResponse<ServiceRequest>> {
        self.call(ApiCommand::AddServiceRequestNote {
            request_id: request_id.to_string(),
            note: note.to_string(),
        })
        .await
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    pub async fn get_notifications(&self, user_id: &str) -> Result<ApiResponse<Vec<Notification>>> {
        self.call(ApiCommand::GetNotifications {
            user_id: user_id.to_string(),
        })
        .await
    }

    pub async fn mark_notification_as_read(&self, notification_id: &str) -> Result<ApiResponse<()>> {
        self.call_unit(ApiCommand::MarkNotificationAsRead {
            notification_id: notification_id.to_string(),
        })
        .await
    }

    pub async fn mark_all_notifications_as_read(&self, user_id: &str) -> Result<ApiResponse<()>> {
        self.call_unit(ApiCommand::MarkAllNotificationsAsRead {
            user_id: user_id.to_string(),
        })
        .await
    }

    pub async fn send_notification(
        &self,
        notification: NewNotification,
    ) -> Result<ApiResponse<Notification>> {
        self.call(ApiCommand::SendNotification(notification)).await
    }

    pub async fn send_bulk_notifications(&self, bulk: BulkNotification) -> Result<ApiResponse<()>> {
        self.call_unit(ApiCommand::SendBulkNotifications(bulk)).await
    }

    // -------------------------------------------------------------------------
    // Analytics and export
    // -------------------------------------------------------------------------

    pub async fn get_dashboard_stats(&self) -> Result<ApiResponse<DashboardStats>> {
        self.call(ApiCommand::GetDashboardStats).await
    }

    pub async fn get_revenue_analytics(&self, period: &str) -> Result<ApiResponse<RevenueAnalytics>> {
        self.call(ApiCommand::GetRevenueAnalytics {
            period: period.to_string(),
        })
        .await
    }

    pub async fn get_occupancy_analytics(
        &self,
        period: &str,
    ) -> Result<ApiResponse<OccupancyAnalytics>> {
        self.call(ApiCommand::GetOccupancyAnalytics {
            period: period.to_string(),
        })
        .await
    }

    pub async fn get_payment_analytics(&self, period: &str) -> Result<ApiResponse<PaymentAnalytics>> {
        self.call(ApiCommand::GetPaymentAnalytics {
            period: period.to_string(),
        })
        .await
    }

    /// `format` defaults to `csv`.
    pub async fn export_data(&self, kind: &str, format: Option<&str>) -> Result<ApiResponse<ExportLink>> {
        self.call(ApiCommand::ExportData {
            kind: kind.to_string(),
            format: format.map(str::to_string),
        })
        .await
    }

    // -------------------------------------------------------------------------
    // Files
    // -------------------------------------------------------------------------

    pub async fn upload_file(
        &self,
        file: FileUpload,
        kind: &str,
        metadata: Option<Value>,
    ) -> Result<ApiResponse<UploadedFile>> {
        self.call(ApiCommand::UploadFile {
            file,
            kind: kind.to_string(),
            metadata,
        })
        .await
    }

    pub async fn delete_file(&self, file_id: &str) -> Result<ApiResponse<()>> {
        self.call_unit(ApiCommand::DeleteFile {
            file_id: file_id.to_string(),
        })
        .await
    }

    // -------------------------------------------------------------------------
    // Raw routes
    // -------------------------------------------------------------------------

    /// Issues a request by verb and endpoint path, e.g.
    /// `request_raw(HttpMethod::Get, "/owner/payments?page=2", None)`.
    ///
    /// In mock mode the route is parsed into an [`ApiCommand`]. Routes the
    /// table does not know answer with an empty success (`data: []`).
    pub async fn request_raw(
        &self,
        method: HttpMethod,
        route: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse<Value>> {
        let call = Call::Raw {
            method,
            route,
            body,
        };
        let call = &call;
        self.with_retry(call.name(), move || self.send(call)).await
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    async fn call<T: DeserializeOwned>(&self, command: ApiCommand) -> Result<ApiResponse<T>> {
        let call = Call::Command(&command);
        let call = &call;
        self.with_retry(command.name(), move || self.send(call)).await
    }

    /// For calls without a payload; whatever `data` the backend sends is
    /// discarded.
    async fn call_unit(&self, command: ApiCommand) -> Result<ApiResponse<()>> {
        let response: ApiResponse<IgnoredAny> = self.call(command).await?;
        Ok(ApiResponse {
            data: None,
            ..response.map(|_| ())
        })
    }

    /// Runs `attempt` until it succeeds or the policy's attempts are used
    /// up, sleeping `n × base_delay` after failed attempt `n`.
    async fn with_retry<T, F, Fut>(&self, operation: &str, mut attempt: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.retry_policy.max_attempts;
        let mut attempts_made = 0;

        loop {
            attempts_made += 1;

            match attempt().await {
                Ok(value) => return Ok(value),
                Err(e) if attempts_made >= max_attempts => {
                    error!(
                        operation,
                        attempts = attempts_made,
                        error = %e,
                        "API request failed after all attempts"
                    );
                    self.emit(CoreEvent::Api(ApiEvent::RequestFailed {
                        operation: operation.to_string(),
                        message: e.to_string(),
                        attempts: attempts_made,
                    }));
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.retry_policy.delay_after(attempts_made);
                    warn!(
                        operation,
                        attempt = attempts_made,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "API retry attempt failed, retrying"
                    );
                    self.emit(CoreEvent::Api(ApiEvent::RetryScheduled {
                        operation: operation.to_string(),
                        attempt: attempts_made,
                        delay_ms: delay.as_millis() as u64,
                    }));
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// One attempt: the mock backend in mock mode, otherwise the network
    /// with a switch to the mock backend on failure.
    async fn send<T: DeserializeOwned>(&self, call: &Call<'_>) -> Result<ApiResponse<T>> {
        if self.is_mock_mode() {
            return decode_value(call.mock(&self.mock).await);
        }

        match self.fetch(call).await {
            Ok(response) => Ok(response),
            Err(e) if self.fallback_to_mock => {
                self.activate_mock_mode(&e);
                decode_value(call.mock(&self.mock).await)
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, call: &Call<'_>) -> Result<ApiResponse<T>> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or(ApiError::NotConfigured("api_base_url"))?;
        let http_client = self
            .http_client
            .as_ref()
            .ok_or(ApiError::NotConfigured("http_client"))?;

        let endpoint = call.endpoint()?;
        let url = endpoint.url(base_url)?;

        let mut request = HttpRequest::new(endpoint.method, url.clone())
            .header("Content-Type", "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
            .timeout(self.timeout);

        if let Some(token) = self.bearer_token().await {
            request = request.bearer_token(token);
        }
        if let Some(body) = &endpoint.body {
            request = request
                .json(body)
                .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        }

        debug!(method = %endpoint.method, url = %url, "API request");

        let response = tokio::time::timeout(self.timeout, http_client.execute(request))
            .await
            .map_err(|_| ApiError::Timeout {
                operation: call.name().to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            })??;

        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                message: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        let envelope = response
            .json()
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        debug!(url = %url, status = response.status, "API response");

        Ok(envelope)
    }

    async fn bearer_token(&self) -> Option<String> {
        match self.tokens.load().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Sending request without auth token");
                None
            }
        }
    }

    fn activate_mock_mode(&self, reason: &ApiError) {
        if self.mock_mode.swap(true, Ordering::SeqCst) {
            return;
        }

        warn!(error = %reason, "Real API failed, falling back to mock API");
        self.emit(CoreEvent::Api(ApiEvent::MockModeActivated {
            reason: reason.to_string(),
        }));
    }

    async fn remember_session(&self, response: &ApiResponse<AuthenticatedUser>) {
        let Some(signed_in) = response.data.as_ref().filter(|_| response.success) else {
            return;
        };

        match self.tokens.save(&signed_in.token).await {
            Ok(()) => self.emit(CoreEvent::Auth(AuthEvent::SignedIn {
                user_id: signed_in.user.uid.clone(),
                role: signed_in.user.role.to_string(),
            })),
            Err(e) => self.emit(CoreEvent::Auth(AuthEvent::AuthError {
                message: e.to_string(),
                recoverable: true,
            })),
        }
    }

    async fn forget_session(&self) {
        match self.tokens.clear().await {
            Ok(()) => self.emit(CoreEvent::Auth(AuthEvent::SignedOut)),
            Err(e) => self.emit(CoreEvent::Auth(AuthEvent::AuthError {
                message: e.to_string(),
                recoverable: true,
            })),
        }
    }

    fn emit(&self, event: CoreEvent) {
        // No subscribers is fine
        self.events.emit(event).ok();
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry_policy", &self.retry_policy)
            .field("ws_url", &self.ws_url)
            .field("mock_mode", &self.is_mock_mode())
            .finish()
    }
}

fn decode_value<T: DeserializeOwned>(response: ApiResponse<Value>) -> Result<ApiResponse<T>> {
    let ApiResponse {
        success,
        data,
        error,
        message,
    } = response;

    let data = data
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| ApiError::Decode(e.to_string()))?;

    Ok(ApiResponse {
        success,
        data,
        error,
        message,
    })
}
