//! In-memory rental repository
//!
//! `RentalStore` owns every collection the mock backend serves. All access
//! goes through one `parking_lot::Mutex`; each operation takes the lock once,
//! does a linear find/filter/mutate and releases it before returning, so no
//! lock is ever held across an await point by callers.

use crate::error::{LibraryError, Result};
use crate::models::*;
use crate::seed;
use bridge_traits::{Clock, SystemClock};
use chrono::SecondsFormat;
use core_auth::{OwnerCredentials, TenantCredentials, UserRole};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The single owner account the canned data set knows about.
pub const OWNER_UID: &str = "owner-1";
pub const OWNER_EMAIL: &str = "owner@example.com";
const OWNER_PASSWORD: &str = "password";

#[derive(Default)]
struct Collections {
    tenants: Vec<TenantProfile>,
    rooms: Vec<Room>,
    payments: Vec<Payment>,
    service_requests: Vec<ServiceRequest>,
    notifications: Vec<Notification>,
    files: Vec<StoredFile>,
}

impl Collections {
    /// Returns `base`, or `base-{n}` for the first free `n` when two creates
    /// land on the same millisecond. Only ids held by a live record count.
    fn unique_id(&self, base: String) -> String {
        let mut candidate = base.clone();
        let mut n = 1;
        while self.id_in_use(&candidate) {
            candidate = format!("{}-{}", base, n);
            n += 1;
        }
        candidate
    }

    fn id_in_use(&self, id: &str) -> bool {
        self.rooms.iter().any(|r| r.id == id)
            || self.payments.iter().any(|p| p.id == id)
            || self.service_requests.iter().any(|sr| {
                sr.id == id || sr.notes.iter().flatten().any(|note| note.id == id)
            })
            || self.notifications.iter().any(|n| n.id == id)
            || self.files.iter().any(|f| f.id == id)
    }

    fn tenant_mut(&mut self, tenant_id: &str) -> Result<&mut TenantProfile> {
        self.tenants
            .iter_mut()
            .find(|t| t.uid == tenant_id)
            .ok_or_else(|| LibraryError::not_found("Tenant", tenant_id))
    }

    fn room_mut(&mut self, room_id: &str) -> Result<&mut Room> {
        self.rooms
            .iter_mut()
            .find(|r| r.id == room_id)
            .ok_or_else(|| LibraryError::not_found("Room", room_id))
    }

    fn service_request_mut(&mut self, request_id: &str) -> Result<&mut ServiceRequest> {
        self.service_requests
            .iter_mut()
            .find(|sr| sr.id == request_id)
            .ok_or_else(|| LibraryError::not_found("Service request", request_id))
    }
}

/// Process-local stand-in for the remote service's data.
///
/// Construct one per process (or one per test) and share it behind an `Arc`.
///
/// # Example
///
/// ```
/// use core_library::RentalStore;
///
/// let store = RentalStore::seeded();
/// assert_eq!(store.rooms().len(), 3);
/// assert!(store.room("room-999").is_err());
/// ```
pub struct RentalStore {
    clock: Arc<dyn Clock>,
    inner: Mutex<Collections>,
}

impl RentalStore {
    /// Store pre-populated with the canned data set, on the system clock.
    pub fn seeded() -> Self {
        Self::seeded_with_clock(Arc::new(SystemClock))
    }

    pub fn seeded_with_clock(clock: Arc<dyn Clock>) -> Self {
        let collections = Collections {
            tenants: seed::tenants(),
            rooms: seed::rooms(),
            payments: seed::payments(),
            service_requests: seed::service_requests(),
            notifications: seed::notifications(),
            ..Collections::default()
        };

        Self {
            clock,
            inner: Mutex::new(collections),
        }
    }

    /// Store with no records at all.
    pub fn empty(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            inner: Mutex::new(Collections::default()),
        }
    }

    fn now(&self) -> String {
        self.clock.now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    fn id_base(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.clock.unix_timestamp_millis())
    }

    // -------------------------------------------------------------------------
    // Auth
    // -------------------------------------------------------------------------

    /// Matches room number and Aadhaar number against the tenant collection.
    pub fn authenticate_tenant(&self, credentials: &TenantCredentials) -> Result<User> {
        let inner = self.inner.lock();
        let tenant = inner
            .tenants
            .iter()
            .find(|t| {
                t.room_number == credentials.room_number
                    && t.aadhaar_number == credentials.aadhaar_number
            })
            .ok_or_else(|| {
                debug!(room_number = %credentials.room_number, "Tenant login rejected");
                LibraryError::InvalidCredentials
            })?;

        Ok(User {
            uid: tenant.uid.clone(),
            email: tenant.email.clone(),
            role: UserRole::Tenant,
            room_number: Some(tenant.room_number.clone()),
            is_onboarding_complete: tenant.is_onboarding_complete,
        })
    }

    pub fn authenticate_owner(&self, credentials: &OwnerCredentials) -> Result<User> {
        if credentials.email != OWNER_EMAIL || credentials.password != OWNER_PASSWORD {
            debug!(email = %credentials.email, "Owner login rejected");
            return Err(LibraryError::InvalidCredentials);
        }

        Ok(User {
            uid: OWNER_UID.to_string(),
            email: OWNER_EMAIL.to_string(),
            role: UserRole::Owner,
            room_number: None,
            is_onboarding_complete: true,
        })
    }

    // -------------------------------------------------------------------------
    // Tenants
    // -------------------------------------------------------------------------

    pub fn tenants(&self) -> Vec<TenantProfile> {
        self.inner.lock().tenants.clone()
    }

    pub fn tenant(&self, tenant_id: &str) -> Result<TenantProfile> {
        self.inner
            .lock()
            .tenants
            .iter()
            .find(|t| t.uid == tenant_id)
            .cloned()
            .ok_or_else(|| LibraryError::not_found("Tenant", tenant_id))
    }

    pub fn update_tenant(&self, tenant_id: &str, patch: &TenantProfilePatch) -> Result<TenantProfile> {
        let now = self.now();
        let mut inner = self.inner.lock();
        let tenant = inner.tenant_mut(tenant_id)?;

        patch.apply_to(tenant);
        tenant.updated_at = now;
        Ok(tenant.clone())
    }

    /// Merges the onboarding details and marks onboarding complete.
    pub fn complete_onboarding(
        &self,
        tenant_id: &str,
        patch: &TenantProfilePatch,
    ) -> Result<TenantProfile> {
        let patch = TenantProfilePatch {
            is_onboarding_complete: Some(true),
            ..patch.clone()
        };
        self.update_tenant(tenant_id, &patch)
    }

    /// Records an uploaded identity document on the tenant's profile.
    /// Only `aadhaar` and `photo` have a slot; other kinds are not recorded.
    pub fn attach_document(&self, tenant_id: &str, kind: &str, url: &str) -> Result<()> {
        let now = self.now();
        let mut inner = self.inner.lock();
        let tenant = inner.tenant_mut(tenant_id)?;

        match kind {
            "aadhaar" => tenant.documents.aadhaar = Some(url.to_string()),
            "photo" => tenant.documents.photo = Some(url.to_string()),
            other => {
                debug!(tenant_id, kind = other, "Document kind has no profile slot");
                return Ok(());
            }
        }
        tenant.updated_at = now;
        Ok(())
    }

    pub fn delete_tenant(&self, tenant_id: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        let index = inner
            .tenants
            .iter()
            .position(|t| t.uid == tenant_id)
            .ok_or_else(|| LibraryError::not_found("Tenant", tenant_id))?;

        inner.tenants.remove(index);
        info!(tenant_id, "Tenant deleted");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Rooms
    // -------------------------------------------------------------------------

    pub fn rooms(&self) -> Vec<Room> {
        self.inner.lock().rooms.clone()
    }

    pub fn room(&self, room_id: &str) -> Result<Room> {
        self.inner
            .lock()
            .rooms
            .iter()
            .find(|r| r.id == room_id)
            .cloned()
            .ok_or_else(|| LibraryError::not_found("Room", room_id))
    }

    /// Appends a room. Rejected when occupancy and tenant disagree.
    pub fn create_room(&self, new_room: NewRoom) -> Result<Room> {
        let now = self.now();
        let base = self.id_base("room");
        let mut inner = self.inner.lock();

        let mut room = Room {
            id: String::new(),
            room_number: new_room.room_number,
            floor: new_room.floor,
            room_type: new_room.room_type,
            rent: new_room.rent,
            deposit: new_room.deposit,
            amenities: new_room.amenities,
            is_occupied: new_room.is_occupied,
            tenant_id: new_room.tenant_id,
            created_at: now.clone(),
            updated_at: now,
        };
        room.validate()
            .map_err(|msg| LibraryError::invalid_input("room", msg))?;

        room.id = inner.unique_id(base);
        inner.rooms.push(room.clone());
        info!(room_id = %room.id, room_number = %room.room_number, "Room created");
        Ok(room)
    }

    /// Shallow merge. The patched room must still satisfy the occupancy
    /// invariant, otherwise nothing changes.
    pub fn update_room(&self, room_id: &str, patch: &RoomPatch) -> Result<Room> {
        let now = self.now();
        let mut inner = self.inner.lock();
        let room = inner.room_mut(room_id)?;

        let mut updated = room.clone();
        patch.apply_to(&mut updated);
        if let Err(msg) = updated.validate() {
            warn!(room_id, %msg, "Rejected room update");
            return Err(LibraryError::invalid_input("room", msg));
        }

        updated.updated_at = now;
        *room = updated.clone();
        Ok(updated)
    }

    pub fn assign_tenant(&self, room_id: &str, tenant_id: &str) -> Result<Room> {
        if tenant_id.trim().is_empty() {
            return Err(LibraryError::invalid_input("tenantId", "cannot be empty"));
        }
        self.update_room(room_id, &RoomPatch::assign(tenant_id))
    }

    pub fn remove_tenant(&self, room_id: &str) -> Result<Room> {
        self.update_room(room_id, &RoomPatch::vacate())
    }

    pub fn delete_room(&self, room_id: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        let index = inner
            .rooms
            .iter()
            .position(|r| r.id == room_id)
            .ok_or_else(|| LibraryError::not_found("Room", room_id))?;

        inner.rooms.remove(index);
        info!(room_id, "Room deleted");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Payments
    // -------------------------------------------------------------------------

    /// Records a pending payment at the front of the list.
    pub fn submit_payment(&self, new_payment: NewPayment) -> Result<Payment> {
        new_payment
            .validate()
            .map_err(|msg| LibraryError::invalid_input("payment", msg))?;

        let now = self.now();
        let base = self.id_base("payment");
        let mut inner = self.inner.lock();

        let payment = Payment {
            id: inner.unique_id(base),
            tenant_id: new_payment.tenant_id,
            room_number: new_payment.room_number,
            amount: new_payment.amount,
            payment_type: new_payment.payment_type,
            month: new_payment.month,
            status: PaymentStatus::Pending,
            payment_method: new_payment.payment_method,
            transaction_id: new_payment.transaction_id,
            receipt_url: new_payment.receipt_url,
            submitted_at: now,
            verified_at: None,
        };
        inner.payments.insert(0, payment.clone());
        info!(payment_id = %payment.id, tenant_id = %payment.tenant_id, "Payment submitted");
        Ok(payment)
    }

    pub fn payments(&self) -> Vec<Payment> {
        self.inner.lock().payments.clone()
    }

    pub fn payments_for_tenant(&self, tenant_id: &str) -> Vec<Payment> {
        self.inner
            .lock()
            .payments
            .iter()
            .filter(|p| p.tenant_id == tenant_id)
            .cloned()
            .collect()
    }

    /// Moves a payment forward. `verifiedAt` is set when the new status is
    /// verified and cleared otherwise.
    pub fn set_payment_status(&self, payment_id: &str, status: PaymentStatus) -> Result<Payment> {
        let now = self.now();
        let mut inner = self.inner.lock();
        let payment = inner
            .payments
            .iter_mut()
            .find(|p| p.id == payment_id)
            .ok_or_else(|| LibraryError::not_found("Payment", payment_id))?;

        if !payment.status.can_transition_to(status) {
            warn!(payment_id, from = %payment.status, to = %status, "Rejected payment transition");
            return Err(LibraryError::InvalidTransition {
                entity_type: "payment".to_string(),
                from: payment.status.to_string(),
                to: status.to_string(),
            });
        }

        if payment.status != status {
            payment.verified_at = (status == PaymentStatus::Verified).then_some(now);
            payment.status = status;
        }
        Ok(payment.clone())
    }

    // -------------------------------------------------------------------------
    // Service requests
    // -------------------------------------------------------------------------

    /// Records a pending request at the front of the list.
    pub fn create_service_request(&self, new_request: NewServiceRequest) -> Result<ServiceRequest> {
        new_request
            .validate()
            .map_err(|msg| LibraryError::invalid_input("serviceRequest", msg))?;

        let now = self.now();
        let base = self.id_base("service");
        let mut inner = self.inner.lock();

        let request = ServiceRequest {
            id: inner.unique_id(base),
            tenant_id: new_request.tenant_id,
            room_number: new_request.room_number,
            request_type: new_request.request_type,
            title: new_request.title,
            description: new_request.description,
            priority: new_request.priority,
            status: ServiceRequestStatus::Pending,
            notes: None,
            created_at: now.clone(),
            updated_at: now,
        };
        inner.service_requests.insert(0, request.clone());
        info!(request_id = %request.id, tenant_id = %request.tenant_id, "Service request created");
        Ok(request)
    }

    pub fn service_requests(&self) -> Vec<ServiceRequest> {
        self.inner.lock().service_requests.clone()
    }

    pub fn service_requests_for_tenant(&self, tenant_id: &str) -> Vec<ServiceRequest> {
        self.inner
            .lock()
            .service_requests
            .iter()
            .filter(|sr| sr.tenant_id == tenant_id)
            .cloned()
            .collect()
    }

    /// Touches only `status` and `updatedAt`.
    pub fn set_service_request_status(
        &self,
        request_id: &str,
        status: ServiceRequestStatus,
    ) -> Result<ServiceRequest> {
        let now = self.now();
        let mut inner = self.inner.lock();
        let request = inner.service_request_mut(request_id)?;

        if !request.status.can_transition_to(status) {
            warn!(request_id, from = %request.status, to = %status, "Rejected service request transition");
            return Err(LibraryError::InvalidTransition {
                entity_type: "service request".to_string(),
                from: request.status.to_string(),
                to: status.to_string(),
            });
        }

        request.status = status;
        request.updated_at = now;
        Ok(request.clone())
    }

    pub fn add_service_request_note(
        &self,
        request_id: &str,
        text: &str,
        author: &str,
    ) -> Result<ServiceRequest> {
        let now = self.now();
        let base = self.id_base("note");
        let mut inner = self.inner.lock();

        let note_id = inner.unique_id(base);

        let request = inner.service_request_mut(request_id)?;
        request.notes.get_or_insert_with(Vec::new).push(ServiceNote {
            id: note_id,
            text: text.to_string(),
            created_at: now.clone(),
            created_by: author.to_string(),
        });
        request.updated_at = now;
        Ok(request.clone())
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    pub fn notifications_for(&self, user_id: &str) -> Vec<Notification> {
        self.inner
            .lock()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn mark_notification_read(&self, notification_id: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        let notification = inner
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
            .ok_or_else(|| LibraryError::not_found("Notification", notification_id))?;

        notification.read = true;
        Ok(())
    }

    /// Marks every notification of `user_id` read. Returns how many changed.
    pub fn mark_all_notifications_read(&self, user_id: &str) -> usize {
        let mut inner = self.inner.lock();
        let mut changed = 0;
        for notification in inner
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.read)
        {
            notification.read = true;
            changed += 1;
        }
        changed
    }

    pub fn push_notification(&self, new_notification: NewNotification) -> Notification {
        let now = self.now();
        let base = self.id_base("notif");
        let mut inner = self.inner.lock();

        let notification = Notification {
            id: inner.unique_id(base),
            user_id: new_notification.user_id,
            kind: new_notification.kind,
            title: new_notification.title,
            message: new_notification.message,
            action_url: new_notification.action_url,
            read: false,
            created_at: now,
        };
        inner.notifications.insert(0, notification.clone());
        notification
    }

    /// One notification per recipient, ids `notif-{millis}-{userId}`.
    pub fn push_bulk_notifications(&self, bulk: &BulkNotification) -> Vec<Notification> {
        let now = self.now();
        let base = self.id_base("notif");
        let mut inner = self.inner.lock();

        let mut created = Vec::with_capacity(bulk.user_ids.len());
        for user_id in &bulk.user_ids {
            let notification = Notification {
                id: inner.unique_id(format!("{}-{}", base, user_id)),
                user_id: user_id.clone(),
                kind: bulk.kind.clone(),
                title: bulk.title.clone(),
                message: bulk.message.clone(),
                action_url: bulk.action_url.clone(),
                read: false,
                created_at: now.clone(),
            };
            inner.notifications.insert(0, notification.clone());
            created.push(notification);
        }
        info!(recipients = created.len(), "Bulk notifications sent");
        created
    }

    // -------------------------------------------------------------------------
    // Analytics
    // -------------------------------------------------------------------------

    pub fn dashboard_stats(&self) -> DashboardStats {
        let inner = self.inner.lock();
        DashboardStats {
            total_rooms: inner.rooms.len(),
            occupied_rooms: inner.rooms.iter().filter(|r| r.is_occupied).count(),
            total_tenants: inner.tenants.len(),
            pending_payments: inner
                .payments
                .iter()
                .filter(|p| p.status == PaymentStatus::Pending)
                .count(),
            total_revenue: inner
                .payments
                .iter()
                .filter(|p| p.status == PaymentStatus::Verified)
                .map(|p| p.amount)
                .sum(),
            pending_service_requests: inner
                .service_requests
                .iter()
                .filter(|sr| sr.status == ServiceRequestStatus::Pending)
                .count(),
        }
    }

    /// Verified revenue grouped by billing month, oldest month first.
    pub fn revenue_analytics(&self, period: &str) -> RevenueAnalytics {
        let inner = self.inner.lock();
        let mut by_month: BTreeMap<&str, f64> = BTreeMap::new();
        for payment in inner
            .payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Verified)
        {
            *by_month.entry(payment.month.as_str()).or_default() += payment.amount;
        }

        let monthly_data: Vec<MonthlyRevenue> = by_month
            .into_iter()
            .map(|(month, revenue)| MonthlyRevenue {
                month: month.to_string(),
                revenue,
            })
            .collect();

        RevenueAnalytics {
            period: period.to_string(),
            total_revenue: monthly_data.iter().map(|m| m.revenue).sum(),
            monthly_data,
        }
    }

    pub fn occupancy_analytics(&self, period: &str) -> OccupancyAnalytics {
        let inner = self.inner.lock();
        let total_rooms = inner.rooms.len();
        let occupied_rooms = inner.rooms.iter().filter(|r| r.is_occupied).count();

        OccupancyAnalytics {
            period: period.to_string(),
            occupancy_rate: percentage(occupied_rooms, total_rooms),
            occupied_rooms,
            total_rooms,
        }
    }

    pub fn payment_analytics(&self, period: &str) -> PaymentAnalytics {
        let inner = self.inner.lock();
        let count = |status: PaymentStatus| inner.payments.iter().filter(|p| p.status == status).count();
        let total_payments = inner.payments.len();
        let verified_payments = count(PaymentStatus::Verified);

        PaymentAnalytics {
            period: period.to_string(),
            total_payments,
            verified_payments,
            pending_payments: count(PaymentStatus::Pending),
            rejected_payments: count(PaymentStatus::Rejected),
            overdue_payments: count(PaymentStatus::Overdue),
            collection_rate: percentage(verified_payments, total_payments),
        }
    }

    // -------------------------------------------------------------------------
    // Files
    // -------------------------------------------------------------------------

    pub fn store_file(
        &self,
        upload: &FileUpload,
        kind: &str,
        metadata: Option<serde_json::Value>,
    ) -> StoredFile {
        let now = self.now();
        let base = self.id_base("file");
        let mut inner = self.inner.lock();

        let file = StoredFile {
            id: inner.unique_id(base),
            name: upload.name.clone(),
            kind: kind.to_string(),
            url: format!("https://example.com/uploads/{}", upload.name),
            size: upload.size(),
            uploaded_at: now,
            metadata,
        };
        inner.files.push(file.clone());
        file
    }

    pub fn files(&self) -> Vec<StoredFile> {
        self.inner.lock().files.clone()
    }

    pub fn delete_file(&self, file_id: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        let index = inner
            .files
            .iter()
            .position(|f| f.id == file_id)
            .ok_or_else(|| LibraryError::not_found("File", file_id))?;

        inner.files.remove(index);
        Ok(())
    }
}

/// `part / whole × 100`, rounded to two decimals; 0 for an empty whole.
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = part as f64 / whole as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::ManualClock;
    use chrono::{Duration, TimeZone, Utc};

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap(),
        ))
    }

    fn store() -> (RentalStore, Arc<ManualClock>) {
        let clock = clock();
        (RentalStore::seeded_with_clock(clock.clone()), clock)
    }

    fn new_payment(amount: f64) -> NewPayment {
        NewPayment {
            tenant_id: "tenant-101".to_string(),
            room_number: "101".to_string(),
            amount,
            payment_type: PaymentType::Rent,
            month: "2024-02".to_string(),
            payment_method: PaymentMethod::Upi,
            transaction_id: Some("TXN555".to_string()),
            receipt_url: None,
        }
    }

    fn new_room(is_occupied: bool, tenant_id: Option<&str>) -> NewRoom {
        NewRoom {
            room_number: "201".to_string(),
            floor: 2,
            room_type: RoomType::Suite,
            rent: 15000.0,
            deposit: 30000.0,
            amenities: vec!["AC".to_string()],
            is_occupied,
            tenant_id: tenant_id.map(str::to_string),
        }
    }

    #[test]
    fn test_tenant_login() {
        let (store, _) = store();

        let user = store
            .authenticate_tenant(&TenantCredentials::new("101", "1234-5678-9012"))
            .unwrap();
        assert_eq!(user.uid, "tenant-101");
        assert_eq!(user.role, UserRole::Tenant);
        assert_eq!(user.room_number.as_deref(), Some("101"));

        let err = store
            .authenticate_tenant(&TenantCredentials::new("101", "wrong"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_owner_login() {
        let (store, _) = store();

        let owner = store
            .authenticate_owner(&OwnerCredentials::new("owner@example.com", "password"))
            .unwrap();
        assert_eq!(owner.uid, OWNER_UID);
        assert_eq!(owner.role, UserRole::Owner);
        assert!(owner.room_number.is_none());

        assert!(store
            .authenticate_owner(&OwnerCredentials::new("owner@example.com", "hunter2"))
            .is_err());
    }

    #[test]
    fn test_update_tenant_merges_and_stamps() {
        let (store, _) = store();
        let patch = TenantProfilePatch {
            phone: Some("+91 9000000000".to_string()),
            ..Default::default()
        };

        let tenant = store.update_tenant("tenant-101", &patch).unwrap();
        assert_eq!(tenant.phone, "+91 9000000000");
        assert_eq!(tenant.name, "John Doe");
        assert_eq!(tenant.updated_at, "2024-02-01T09:30:00.000Z");

        assert!(matches!(
            store.update_tenant("tenant-999", &patch),
            Err(LibraryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_complete_onboarding_forces_flag() {
        let (store, _) = store();
        store
            .update_tenant(
                "tenant-102",
                &TenantProfilePatch {
                    is_onboarding_complete: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        let tenant = store
            .complete_onboarding(
                "tenant-102",
                &TenantProfilePatch {
                    is_onboarding_complete: Some(false),
                    name: Some("Alice S.".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(tenant.is_onboarding_complete);
        assert_eq!(tenant.name, "Alice S.");
    }

    #[test]
    fn test_attach_document() {
        let (store, _) = store();
        store
            .attach_document("tenant-101", "photo", "https://example.com/photo-tenant-101.pdf")
            .unwrap();
        store
            .attach_document("tenant-101", "lease", "https://example.com/lease-tenant-101.pdf")
            .unwrap();

        let tenant = store.tenant("tenant-101").unwrap();
        assert_eq!(
            tenant.documents.photo.as_deref(),
            Some("https://example.com/photo-tenant-101.pdf")
        );
        assert!(store.attach_document("tenant-999", "photo", "x").is_err());
    }

    #[test]
    fn test_delete_tenant() {
        let (store, _) = store();
        store.delete_tenant("tenant-102").unwrap();

        assert_eq!(store.tenants().len(), 1);
        assert_eq!(
            store.delete_tenant("tenant-102").unwrap_err().to_string(),
            "Tenant not found"
        );
    }

    #[test]
    fn test_create_room_appends_with_clock_id() {
        let (store, clock) = store();
        let room = store.create_room(new_room(false, None)).unwrap();

        assert_eq!(room.id, format!("room-{}", clock.unix_timestamp_millis()));
        assert_eq!(room.created_at, room.updated_at);
        assert_eq!(store.rooms().last().map(|r| r.id.clone()), Some(room.id));
    }

    #[test]
    fn test_create_room_rejects_broken_occupancy() {
        let (store, _) = store();

        assert!(store.create_room(new_room(true, None)).is_err());
        assert!(store.create_room(new_room(false, Some("tenant-101"))).is_err());
        assert_eq!(store.rooms().len(), 3);
    }

    #[test]
    fn test_rapid_creates_get_distinct_ids() {
        let (store, _) = store();

        let first = store.create_room(new_room(false, None)).unwrap();
        let second = store.create_room(new_room(false, None)).unwrap();
        let third = store.create_room(new_room(false, None)).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(second.id, format!("{}-1", first.id));
        assert_eq!(third.id, format!("{}-2", first.id));
    }

    #[test]
    fn test_deleted_ids_are_released() {
        let (store, _) = store();

        let first = store.create_room(new_room(false, None)).unwrap();
        let second = store.create_room(new_room(false, None)).unwrap();
        store.delete_room(&first.id).unwrap();

        let third = store.create_room(new_room(false, None)).unwrap();
        assert_eq!(third.id, first.id);
        assert_ne!(third.id, second.id);

        store.delete_room(&second.id).unwrap();
        store.delete_room(&third.id).unwrap();
        let fourth = store.create_room(new_room(false, None)).unwrap();
        assert_eq!(fourth.id, first.id);
    }

    #[test]
    fn test_ids_are_unique_across_collections() {
        let (store, clock) = store();
        let stamp = clock.unix_timestamp_millis();

        let note = store
            .add_service_request_note("service-1", "Booked", OWNER_UID)
            .unwrap()
            .notes
            .unwrap()
            .pop()
            .unwrap();
        assert_eq!(note.id, format!("note-{}", stamp));

        let again = store
            .add_service_request_note("service-1", "Confirmed", OWNER_UID)
            .unwrap()
            .notes
            .unwrap()
            .pop()
            .unwrap();
        assert_eq!(again.id, format!("note-{}-1", stamp));
    }

    #[test]
    fn test_update_room_keeps_invariant() {
        let (store, clock) = store();
        clock.advance(Duration::minutes(5));

        let err = store
            .update_room(
                "room-103",
                &RoomPatch {
                    is_occupied: Some(true),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, LibraryError::InvalidInput { .. }));
        assert!(!store.room("room-103").unwrap().is_occupied);

        let room = store
            .update_room(
                "room-103",
                &RoomPatch {
                    rent: Some(12500.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(room.rent, 12500.0);
        assert_eq!(room.updated_at, "2024-02-01T09:35:00.000Z");
    }

    #[test]
    fn test_assign_and_remove_tenant() {
        let (store, _) = store();

        let room = store.assign_tenant("room-103", "tenant-102").unwrap();
        assert!(room.is_occupied);
        assert_eq!(room.tenant_id.as_deref(), Some("tenant-102"));

        let room = store.remove_tenant("room-103").unwrap();
        assert!(!room.is_occupied);
        assert!(room.tenant_id.is_none());

        assert!(store.assign_tenant("room-999", "tenant-102").is_err());
        assert!(store.assign_tenant("room-103", " ").is_err());
    }

    #[test]
    fn test_delete_room() {
        let (store, _) = store();
        store.delete_room("room-103").unwrap();

        assert_eq!(store.rooms().len(), 2);
        assert_eq!(store.delete_room("room-103").unwrap_err().to_string(), "Room not found");
    }

    #[test]
    fn test_submit_payment_is_pending_and_first() {
        let (store, _) = store();
        let payment = store.submit_payment(new_payment(8000.0)).unwrap();

        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(payment.verified_at.is_none());
        assert_eq!(store.payments()[0].id, payment.id);

        let mine = store.payments_for_tenant("tenant-101");
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().any(|p| p.id == payment.id && p.amount == 8000.0));

        assert!(store.submit_payment(new_payment(-1.0)).is_err());
    }

    #[test]
    fn test_payment_status_is_one_directional() {
        let (store, _) = store();

        let verified = store
            .set_payment_status("payment-2", PaymentStatus::Verified)
            .unwrap();
        assert_eq!(verified.verified_at.as_deref(), Some("2024-02-01T09:30:00.000Z"));

        // Re-applying is fine and keeps the original stamp
        let again = store
            .set_payment_status("payment-2", PaymentStatus::Verified)
            .unwrap();
        assert_eq!(again.verified_at, verified.verified_at);

        let err = store
            .set_payment_status("payment-2", PaymentStatus::Pending)
            .unwrap_err();
        assert!(matches!(err, LibraryError::InvalidTransition { .. }));
        assert_eq!(
            store.payments().iter().find(|p| p.id == "payment-2").unwrap().status,
            PaymentStatus::Verified
        );
    }

    #[test]
    fn test_overdue_payment_can_still_resolve() {
        let (store, _) = store();
        let payment = store.submit_payment(new_payment(500.0)).unwrap();

        let overdue = store
            .set_payment_status(&payment.id, PaymentStatus::Overdue)
            .unwrap();
        assert!(overdue.verified_at.is_none());

        let rejected = store
            .set_payment_status(&payment.id, PaymentStatus::Rejected)
            .unwrap();
        assert_eq!(rejected.status, PaymentStatus::Rejected);
        assert!(rejected.verified_at.is_none());
    }

    #[test]
    fn test_service_request_status_touches_only_status_and_updated_at() {
        let (store, clock) = store();
        let before = store
            .service_requests()
            .into_iter()
            .find(|sr| sr.id == "service-1")
            .unwrap();
        clock.advance(Duration::hours(1));

        let after = store
            .set_service_request_status("service-1", ServiceRequestStatus::Completed)
            .unwrap();

        assert_eq!(after.status, ServiceRequestStatus::Completed);
        assert_ne!(after.updated_at, before.updated_at);
        assert_eq!(
            ServiceRequest {
                status: before.status,
                updated_at: before.updated_at.clone(),
                ..after.clone()
            },
            before
        );

        // Terminal
        assert!(store
            .set_service_request_status("service-1", ServiceRequestStatus::InProgress)
            .is_err());
    }

    #[test]
    fn test_service_request_notes_append() {
        let (store, clock) = store();

        store
            .add_service_request_note("service-2", "Scheduled for Monday", OWNER_UID)
            .unwrap();
        clock.advance(Duration::seconds(1));
        let request = store
            .add_service_request_note("service-2", "Cleaner confirmed", OWNER_UID)
            .unwrap();

        let notes = request.notes.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].text, "Scheduled for Monday");
        assert_eq!(notes[1].created_by, "owner-1");
        assert!(notes[0].id.starts_with("note-"));

        assert_eq!(
            store
                .add_service_request_note("service-9", "x", OWNER_UID)
                .unwrap_err()
                .to_string(),
            "Service request not found"
        );
    }

    #[test]
    fn test_create_service_request_prepends_pending() {
        let (store, _) = store();
        let request = store
            .create_service_request(NewServiceRequest {
                tenant_id: "tenant-102".to_string(),
                room_number: "102".to_string(),
                request_type: ServiceRequestType::Plumbing,
                title: "Leaking tap".to_string(),
                description: "Bathroom tap drips all night.".to_string(),
                priority: Priority::Low,
            })
            .unwrap();

        assert_eq!(request.status, ServiceRequestStatus::Pending);
        assert_eq!(store.service_requests()[0].id, request.id);
        assert_eq!(store.service_requests_for_tenant("tenant-102").len(), 2);
    }

    #[test]
    fn test_mark_all_notifications_read_is_idempotent() {
        let (store, _) = store();
        store.push_notification(NewNotification {
            user_id: "tenant-101".to_string(),
            kind: "general".to_string(),
            title: "Water outage".to_string(),
            message: "Water supply off from 2pm".to_string(),
            action_url: None,
        });

        assert_eq!(store.mark_all_notifications_read("tenant-101"), 2);
        assert!(store.notifications_for("tenant-101").iter().all(|n| n.read));

        assert_eq!(store.mark_all_notifications_read("tenant-101"), 0);
        assert!(store.notifications_for("tenant-101").iter().all(|n| n.read));

        assert!(!store.notifications_for("tenant-102")[0].read);
    }

    #[test]
    fn test_mark_notification_read() {
        let (store, _) = store();
        store.mark_notification_read("notif-2").unwrap();

        assert!(store.notifications_for("tenant-102")[0].read);
        assert!(store.mark_notification_read("notif-9").is_err());
    }

    #[test]
    fn test_bulk_notifications() {
        let (store, clock) = store();
        let created = store.push_bulk_notifications(&BulkNotification {
            user_ids: vec!["tenant-101".to_string(), "tenant-102".to_string()],
            kind: "general".to_string(),
            title: "Rent reminder".to_string(),
            message: "Rent is due on the 5th".to_string(),
            action_url: Some("/tenant/payments".to_string()),
        });

        let millis = clock.unix_timestamp_millis();
        assert_eq!(created.len(), 2);
        assert_eq!(created[0].id, format!("notif-{}-tenant-101", millis));
        assert_eq!(created[1].id, format!("notif-{}-tenant-102", millis));
        assert_eq!(store.notifications_for("tenant-102")[0].title, "Rent reminder");
    }

    #[test]
    fn test_dashboard_stats_from_seed() {
        let (store, _) = store();
        let stats = store.dashboard_stats();

        assert_eq!(stats.total_rooms, 3);
        assert_eq!(stats.occupied_rooms, 2);
        assert_eq!(stats.total_tenants, 2);
        assert_eq!(stats.pending_payments, 1);
        assert_eq!(stats.total_revenue, 8000.0);
        assert_eq!(stats.pending_service_requests, 1);
    }

    #[test]
    fn test_revenue_grouped_by_month() {
        let (store, _) = store();
        let payment = store.submit_payment(new_payment(9000.0)).unwrap();
        store
            .set_payment_status(&payment.id, PaymentStatus::Verified)
            .unwrap();

        let revenue = store.revenue_analytics("6m");
        assert_eq!(revenue.period, "6m");
        assert_eq!(revenue.total_revenue, 17000.0);
        assert_eq!(
            revenue.monthly_data,
            vec![
                MonthlyRevenue { month: "2024-01".to_string(), revenue: 8000.0 },
                MonthlyRevenue { month: "2024-02".to_string(), revenue: 9000.0 },
            ]
        );
    }

    #[test]
    fn test_occupancy_and_payment_analytics() {
        let (store, _) = store();

        let occupancy = store.occupancy_analytics("month");
        assert_eq!(occupancy.occupancy_rate, 66.67);

        let payments = store.payment_analytics("month");
        assert_eq!(payments.total_payments, 2);
        assert_eq!(payments.verified_payments, 1);
        assert_eq!(payments.pending_payments, 1);
        assert_eq!(payments.collection_rate, 50.0);

        let empty = RentalStore::empty(clock());
        assert_eq!(empty.occupancy_analytics("month").occupancy_rate, 0.0);
        assert_eq!(empty.payment_analytics("month").collection_rate, 0.0);
    }

    #[test]
    fn test_files() {
        let (store, _) = store();
        let file = store.store_file(
            &FileUpload::new("lease.pdf", "application/pdf", vec![0; 16]),
            "document",
            Some(serde_json::json!({ "tenantId": "tenant-101" })),
        );

        assert_eq!(file.url, "https://example.com/uploads/lease.pdf");
        assert_eq!(file.size, 16);
        assert_eq!(store.files().len(), 1);

        store.delete_file(&file.id).unwrap();
        assert_eq!(store.delete_file(&file.id).unwrap_err().to_string(), "File not found");
    }
}
