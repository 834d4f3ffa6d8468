//! Latency-simulating capability methods over a `RentalStore`

use crate::feed::{PushUpdate, Subscription};
use bridge_traits::{Clock, SystemClock};
use core_auth::{OwnerCredentials, TenantCredentials};
use core_library::{
    ApiResponse, AuthenticatedUser, BulkNotification, DashboardStats, DocumentLink, ExportLink,
    FileUpload, NewNotification, NewPayment, NewRoom, NewServiceRequest, Notification,
    OccupancyAnalytics, PageQuery, Paginated, Payment, PaymentAnalytics, PaymentStatus,
    RefreshedToken, RentalStore, RevenueAnalytics, Room, RoomPatch, ServiceRequest,
    ServiceRequestStatus, TenantProfile, TenantProfilePatch, UploadedFile, User, OWNER_UID,
};
use core_runtime::config::{FeedSettings, MockLatency};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Base address of every fake link the mock hands out.
pub const FAKE_UPLOAD_HOST: &str = "https://example.com";

const REFRESHED_TOKEN: &str = "mock-refreshed-token";
const DEFAULT_EXPORT_FORMAT: &str = "csv";

/// In-process replacement for the remote service.
///
/// Cheap to clone; clones share the same store.
///
/// # Example
///
/// ```no_run
/// use core_auth::TenantCredentials;
/// use core_mock::MockBackend;
///
/// # async fn example() {
/// let backend = MockBackend::seeded();
/// let response = backend
///     .login(&TenantCredentials::new("101", "1234-5678-9012"))
///     .await;
/// assert!(response.success);
/// # }
/// ```
#[derive(Clone)]
pub struct MockBackend {
    store: Arc<RentalStore>,
    latency: MockLatency,
    feed: FeedSettings,
    clock: Arc<dyn Clock>,
}

impl MockBackend {
    pub fn new(
        store: Arc<RentalStore>,
        latency: MockLatency,
        feed: FeedSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            latency,
            feed,
            clock,
        }
    }

    /// Canned data set, default latencies, system clock.
    pub fn seeded() -> Self {
        Self::new(
            Arc::new(RentalStore::seeded()),
            MockLatency::default(),
            FeedSettings::mock_backend(),
            Arc::new(SystemClock),
        )
    }

    pub fn store(&self) -> &Arc<RentalStore> {
        &self.store
    }

    async fn pause(&self, latency: Duration) {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    async fn standard(&self) {
        self.pause(self.latency.standard).await;
    }

    fn issue_token(user: User) -> AuthenticatedUser {
        let token = format!("mock-token-{}", user.uid);
        AuthenticatedUser { user, token }
    }

    // -------------------------------------------------------------------------
    // Auth
    // -------------------------------------------------------------------------

    pub async fn login(&self, credentials: &TenantCredentials) -> ApiResponse<AuthenticatedUser> {
        self.standard().await;
        let result = self.store.authenticate_tenant(credentials).map(Self::issue_token);
        if let Ok(user) = &result {
            info!(user_id = %user.user.uid, "Mock tenant login");
        }
        result.into()
    }

    pub async fn login_owner(&self, credentials: &OwnerCredentials) -> ApiResponse<AuthenticatedUser> {
        self.standard().await;
        let result = self.store.authenticate_owner(credentials).map(Self::issue_token);
        if result.is_ok() {
            info!(user_id = OWNER_UID, "Mock owner login");
        }
        result.into()
    }

    pub async fn logout(&self) -> ApiResponse<()> {
        self.pause(self.latency.quick).await;
        ApiResponse::empty()
    }

    pub async fn refresh_token(&self) -> ApiResponse<RefreshedToken> {
        self.pause(self.latency.quick).await;
        ApiResponse::ok(RefreshedToken {
            token: REFRESHED_TOKEN.to_string(),
        })
    }

    // -------------------------------------------------------------------------
    // Tenants
    // -------------------------------------------------------------------------

    pub async fn get_tenant_profile(&self, tenant_id: &str) -> ApiResponse<TenantProfile> {
        self.standard().await;
        self.store.tenant(tenant_id).into()
    }

    pub async fn update_tenant_profile(
        &self,
        tenant_id: &str,
        patch: &TenantProfilePatch,
    ) -> ApiResponse<TenantProfile> {
        self.standard().await;
        self.store.update_tenant(tenant_id, patch).into()
    }

    pub async fn complete_tenant_onboarding(
        &self,
        tenant_id: &str,
        patch: &TenantProfilePatch,
    ) -> ApiResponse<TenantProfile> {
        self.standard().await;
        self.store.complete_onboarding(tenant_id, patch).into()
    }

    /// Returns `https://example.com/{kind}-{tenantId}.pdf` and records the
    /// link on the profile for `aadhaar` and `photo`.
    pub async fn upload_tenant_document(
        &self,
        tenant_id: &str,
        file: &FileUpload,
        kind: &str,
    ) -> ApiResponse<DocumentLink> {
        self.pause(self.latency.upload).await;
        let url = format!("{}/{}-{}.pdf", FAKE_UPLOAD_HOST, kind, tenant_id);
        debug!(tenant_id, kind, file = %file.name, "Mock document upload");

        let recorded = self.store.attach_document(tenant_id, kind, &url);
        recorded.map(|()| DocumentLink { url }).into()
    }

    pub async fn get_all_tenants(&self, query: &PageQuery) -> ApiResponse<Paginated<TenantProfile>> {
        self.standard().await;
        ApiResponse::ok(Paginated::whole(self.store.tenants(), query))
    }

    pub async fn get_tenant_by_id(&self, tenant_id: &str) -> ApiResponse<TenantProfile> {
        self.get_tenant_profile(tenant_id).await
    }

    pub async fn update_tenant_by_owner(
        &self,
        tenant_id: &str,
        patch: &TenantProfilePatch,
    ) -> ApiResponse<TenantProfile> {
        self.update_tenant_profile(tenant_id, patch).await
    }

    pub async fn delete_tenant(&self, tenant_id: &str) -> ApiResponse<()> {
        self.standard().await;
        ApiResponse::from_unit(self.store.delete_tenant(tenant_id))
    }

    // -------------------------------------------------------------------------
    // Rooms
    // -------------------------------------------------------------------------

    pub async fn get_all_rooms(&self) -> ApiResponse<Vec<Room>> {
        self.standard().await;
        ApiResponse::ok(self.store.rooms())
    }

    pub async fn get_room_by_id(&self, room_id: &str) -> ApiResponse<Room> {
        self.standard().await;
        self.store.room(room_id).into()
    }

    pub async fn create_room(&self, room: &NewRoom) -> ApiResponse<Room> {
        self.standard().await;
        self.store.create_room(room.clone()).into()
    }

    pub async fn update_room(&self, room_id: &str, patch: &RoomPatch) -> ApiResponse<Room> {
        self.standard().await;
        self.store.update_room(room_id, patch).into()
    }

    pub async fn delete_room(&self, room_id: &str) -> ApiResponse<()> {
        self.standard().await;
        ApiResponse::from_unit(self.store.delete_room(room_id))
    }

    pub async fn assign_tenant_to_room(&self, room_id: &str, tenant_id: &str) -> ApiResponse<Room> {
        self.standard().await;
        self.store.assign_tenant(room_id, tenant_id).into()
    }

    pub async fn remove_tenant_from_room(&self, room_id: &str) -> ApiResponse<Room> {
        self.standard().await;
        self.store.remove_tenant(room_id).into()
    }

    // -------------------------------------------------------------------------
    // Payments
    // -------------------------------------------------------------------------

    pub async fn submit_payment(&self, payment: &NewPayment) -> ApiResponse<Payment> {
        self.standard().await;
        self.store.submit_payment(payment.clone()).into()
    }

    pub async fn get_tenant_payments(&self, tenant_id: &str) -> ApiResponse<Vec<Payment>> {
        self.standard().await;
        ApiResponse::ok(self.store.payments_for_tenant(tenant_id))
    }

    pub async fn get_all_payments(&self, query: &PageQuery) -> ApiResponse<Paginated<Payment>> {
        self.standard().await;
        ApiResponse::ok(Paginated::whole(self.store.payments(), query))
    }

    pub async fn update_payment_status(
        &self,
        payment_id: &str,
        status: PaymentStatus,
    ) -> ApiResponse<Payment> {
        self.standard().await;
        self.store.set_payment_status(payment_id, status).into()
    }

    pub async fn verify_payment(&self, payment_id: &str, verified: bool) -> ApiResponse<Payment> {
        let status = if verified {
            PaymentStatus::Verified
        } else {
            PaymentStatus::Rejected
        };
        self.update_payment_status(payment_id, status).await
    }

    // -------------------------------------------------------------------------
    // Service requests
    // -------------------------------------------------------------------------

    pub async fn create_service_request(&self, request: &NewServiceRequest) -> ApiResponse<ServiceRequest> {
        self.standard().await;
        self.store.create_service_request(request.clone()).into()
    }

    pub async fn get_tenant_service_requests(&self, tenant_id: &str) -> ApiResponse<Vec<ServiceRequest>> {
        self.standard().await;
        ApiResponse::ok(self.store.service_requests_for_tenant(tenant_id))
    }

    pub async fn get_all_service_requests(
        &self,
        query: &PageQuery,
    ) -> ApiResponse<Paginated<ServiceRequest>> {
        self.standard().await;
        ApiResponse::ok(Paginated::whole(self.store.service_requests(), query))
    }

    pub async fn update_service_request_status(
        &self,
        request_id: &str,
        status: ServiceRequestStatus,
    ) -> ApiResponse<ServiceRequest> {
        self.standard().await;
        self.store.set_service_request_status(request_id, status).into()
    }

    /// Notes added through the owner dashboard are attributed to the owner.
    pub async fn add_service_request_note(&self, request_id: &str, note: &str) -> ApiResponse<ServiceRequest> {
        self.standard().await;
        self.store
            .add_service_request_note(request_id, note, OWNER_UID)
            .into()
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    pub async fn get_notifications(&self, user_id: &str) -> ApiResponse<Vec<Notification>> {
        self.standard().await;
        ApiResponse::ok(self.store.notifications_for(user_id))
    }

    pub async fn mark_notification_as_read(&self, notification_id: &str) -> ApiResponse<()> {
        self.standard().await;
        ApiResponse::from_unit(self.store.mark_notification_read(notification_id))
    }

    pub async fn mark_all_notifications_as_read(&self, user_id: &str) -> ApiResponse<()> {
        self.standard().await;
        let changed = self.store.mark_all_notifications_read(user_id);
        debug!(user_id, changed, "Marked notifications read");
        ApiResponse::empty()
    }

    pub async fn send_notification(&self, notification: &NewNotification) -> ApiResponse<Notification> {
        self.standard().await;
        ApiResponse::ok(self.store.push_notification(notification.clone()))
    }

    pub async fn send_bulk_notifications(&self, bulk: &BulkNotification) -> ApiResponse<()> {
        self.standard().await;
        self.store.push_bulk_notifications(bulk);
        ApiResponse::empty()
    }

    // -------------------------------------------------------------------------
    // Analytics
    // -------------------------------------------------------------------------

    pub async fn get_dashboard_stats(&self) -> ApiResponse<DashboardStats> {
        self.standard().await;
        ApiResponse::ok(self.store.dashboard_stats())
    }

    pub async fn get_revenue_analytics(&self, period: &str) -> ApiResponse<RevenueAnalytics> {
        self.standard().await;
        ApiResponse::ok(self.store.revenue_analytics(period))
    }

    pub async fn get_occupancy_analytics(&self, period: &str) -> ApiResponse<OccupancyAnalytics> {
        self.standard().await;
        ApiResponse::ok(self.store.occupancy_analytics(period))
    }

    pub async fn get_payment_analytics(&self, period: &str) -> ApiResponse<PaymentAnalytics> {
        self.standard().await;
        ApiResponse::ok(self.store.payment_analytics(period))
    }

    /// Link to `https://example.com/export-{kind}.{format}`, csv by default.
    pub async fn export_data(&self, kind: &str, format: Option<&str>) -> ApiResponse<ExportLink> {
        self.pause(self.latency.export).await;
        let format = format.unwrap_or(DEFAULT_EXPORT_FORMAT);
        ApiResponse::ok(ExportLink {
            download_url: format!("{}/export-{}.{}", FAKE_UPLOAD_HOST, kind, format),
        })
    }

    // -------------------------------------------------------------------------
    // Files
    // -------------------------------------------------------------------------

    pub async fn upload_file(
        &self,
        file: &FileUpload,
        kind: &str,
        metadata: Option<&serde_json::Value>,
    ) -> ApiResponse<UploadedFile> {
        self.pause(self.latency.upload).await;
        let stored = self.store.store_file(file, kind, metadata.cloned());
        ApiResponse::ok(UploadedFile {
            url: stored.url,
            id: stored.id,
        })
    }

    pub async fn delete_file(&self, file_id: &str) -> ApiResponse<()> {
        self.standard().await;
        ApiResponse::from_unit(self.store.delete_file(file_id))
    }

    // -------------------------------------------------------------------------
    // Updates
    // -------------------------------------------------------------------------

    /// Starts the fake push feed for `user_id`. Must be called from within a
    /// tokio runtime.
    pub fn subscribe_to_updates<F>(&self, user_id: &str, callback: F) -> Subscription
    where
        F: Fn(PushUpdate) + Send + Sync + 'static,
    {
        Subscription::start(user_id, self.feed, self.clock.clone(), callback)
    }
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBackend")
            .field("latency", &self.latency)
            .field("feed", &self.feed)
            .finish()
    }
}
