//! Domain models for the rental dashboard
//!
//! Records travel on the wire with camelCase names, so every type here is
//! serde-compatible with the backend's JSON.

use core_auth::UserRole;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// =============================================================================
// Users
// =============================================================================

/// A signed-in account as the backend describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    pub email: String,
    pub role: UserRole,
    /// Set for tenants only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    pub is_onboarding_complete: bool,
}

/// Login result: the user plus the issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}

// =============================================================================
// Tenants
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relation: String,
}

/// Links to uploaded identity documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantDocuments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aadhaar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantProfile {
    pub uid: String,
    pub room_number: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub aadhaar_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(default)]
    pub documents: TenantDocuments,
    pub is_onboarding_complete: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Partial tenant update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aadhaar_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<TenantDocuments>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_onboarding_complete: Option<bool>,
}

impl TenantProfilePatch {
    /// Shallow merge into `tenant`.
    pub fn apply_to(&self, tenant: &mut TenantProfile) {
        if let Some(room_number) = &self.room_number {
            tenant.room_number = room_number.clone();
        }
        if let Some(name) = &self.name {
            tenant.name = name.clone();
        }
        if let Some(email) = &self.email {
            tenant.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            tenant.phone = phone.clone();
        }
        if let Some(aadhaar_number) = &self.aadhaar_number {
            tenant.aadhaar_number = aadhaar_number.clone();
        }
        if let Some(contact) = &self.emergency_contact {
            tenant.emergency_contact = Some(contact.clone());
        }
        if let Some(documents) = &self.documents {
            tenant.documents = documents.clone();
        }
        if let Some(done) = self.is_onboarding_complete {
            tenant.is_onboarding_complete = done;
        }
    }
}

// =============================================================================
// Rooms
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Single,
    Double,
    Triple,
    Suite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub room_number: String,
    pub floor: i32,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub rent: f64,
    pub deposit: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub is_occupied: bool,
    /// Weak reference to `TenantProfile::uid`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Room {
    /// Validate room data
    ///
    /// A room is occupied exactly when it names a tenant.
    pub fn validate(&self) -> Result<(), String> {
        if self.room_number.trim().is_empty() {
            return Err("Room number cannot be empty".to_string());
        }

        if self.rent < 0.0 || self.deposit < 0.0 {
            return Err("Rent and deposit cannot be negative".to_string());
        }

        match (self.is_occupied, &self.tenant_id) {
            (true, None) => Err(format!(
                "Room {} is marked occupied but has no tenant",
                self.room_number
            )),
            (false, Some(tenant_id)) => Err(format!(
                "Room {} has tenant {} but is not marked occupied",
                self.room_number, tenant_id
            )),
            _ => Ok(()),
        }
    }
}

/// Creation payload for a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    pub room_number: String,
    pub floor: i32,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub rent: f64,
    pub deposit: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub is_occupied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

/// Partial room update.
///
/// `tenant_id` is tri-state: `None` leaves it alone, `Some(None)` clears it
/// (serialized as `null`), `Some(Some(id))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub room_type: Option<RoomType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_occupied: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub tenant_id: Option<Option<String>>,
}

impl RoomPatch {
    /// Occupy the room with `tenant_id`.
    pub fn assign(tenant_id: impl Into<String>) -> Self {
        Self {
            is_occupied: Some(true),
            tenant_id: Some(Some(tenant_id.into())),
            ..Self::default()
        }
    }

    /// Vacate the room.
    pub fn vacate() -> Self {
        Self {
            is_occupied: Some(false),
            tenant_id: Some(None),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, room: &mut Room) {
        if let Some(room_number) = &self.room_number {
            room.room_number = room_number.clone();
        }
        if let Some(floor) = self.floor {
            room.floor = floor;
        }
        if let Some(room_type) = self.room_type {
            room.room_type = room_type;
        }
        if let Some(rent) = self.rent {
            room.rent = rent;
        }
        if let Some(deposit) = self.deposit {
            room.deposit = deposit;
        }
        if let Some(amenities) = &self.amenities {
            room.amenities = amenities.clone();
        }
        if let Some(occupied) = self.is_occupied {
            room.is_occupied = occupied;
        }
        if let Some(tenant_id) = &self.tenant_id {
            room.tenant_id = tenant_id.clone();
        }
    }
}

/// A present field always deserializes to `Some`, so `null` becomes
/// `Some(None)` while a missing field falls back to the `None` default.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Payments
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Rent,
    Deposit,
    Maintenance,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Verified,
    Rejected,
    Overdue,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Verified => "verified",
            PaymentStatus::Rejected => "rejected",
            PaymentStatus::Overdue => "overdue",
        }
    }

    /// Status only moves forward: nothing returns to pending, and verified
    /// or rejected payments are settled. Re-applying the current status is
    /// always allowed.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        if *self == next {
            return true;
        }
        match self {
            PaymentStatus::Pending => true,
            PaymentStatus::Overdue => {
                matches!(next, PaymentStatus::Verified | PaymentStatus::Rejected)
            }
            PaymentStatus::Verified | PaymentStatus::Rejected => false,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Upi,
    BankTransfer,
    Cash,
    Card,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub tenant_id: String,
    pub room_number: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    /// Billing month, `YYYY-MM`
    pub month: String,
    pub status: PaymentStatus,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
    pub submitted_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<String>,
}

/// Payment submission. New payments always start out pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub tenant_id: String,
    pub room_number: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub month: String,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
}

impl NewPayment {
    pub fn validate(&self) -> Result<(), String> {
        if self.tenant_id.trim().is_empty() {
            return Err("Payment must name a tenant".to_string());
        }
        if !(self.amount > 0.0) {
            return Err(format!("Payment amount must be positive, got {}", self.amount));
        }
        Ok(())
    }
}

// =============================================================================
// Service requests
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceRequestType {
    Maintenance,
    Cleaning,
    Plumbing,
    Electrical,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceRequestStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl ServiceRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceRequestStatus::Pending => "pending",
            ServiceRequestStatus::InProgress => "in-progress",
            ServiceRequestStatus::Completed => "completed",
            ServiceRequestStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ServiceRequestStatus::Completed | ServiceRequestStatus::Cancelled
        )
    }

    /// Requests never go back to pending and completed or cancelled ones
    /// stay put. Re-applying the current status is allowed.
    pub fn can_transition_to(&self, next: ServiceRequestStatus) -> bool {
        if *self == next {
            return true;
        }
        !self.is_terminal() && next != ServiceRequestStatus::Pending
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ServiceRequestStatus::Pending),
            "in-progress" => Some(ServiceRequestStatus::InProgress),
            "completed" => Some(ServiceRequestStatus::Completed),
            "cancelled" => Some(ServiceRequestStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only note on a service request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceNote {
    pub id: String,
    pub text: String,
    pub created_at: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub id: String,
    pub tenant_id: String,
    pub room_number: String,
    #[serde(rename = "type")]
    pub request_type: ServiceRequestType,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: ServiceRequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<ServiceNote>>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewServiceRequest {
    pub tenant_id: String,
    pub room_number: String,
    #[serde(rename = "type")]
    pub request_type: ServiceRequestType,
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl NewServiceRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.tenant_id.trim().is_empty() {
            return Err("Service request must name a tenant".to_string());
        }
        if self.title.trim().is_empty() {
            return Err("Service request title cannot be empty".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// Notifications
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    /// Free-form category such as `payment` or `service`
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    pub read: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

/// One notification fanned out to several users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkNotification {
    pub user_ids: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

// =============================================================================
// Files
// =============================================================================

/// Raw file handed in by the host for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Record behind an uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub id: String,
    pub name: String,
    /// Caller-supplied category, e.g. `receipt`
    pub kind: String,
    pub url: String,
    pub size: u64,
    pub uploaded_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLink {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportLink {
    pub download_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshedToken {
    pub token: String,
}

// =============================================================================
// Analytics
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_rooms: usize,
    pub occupied_rooms: usize,
    pub total_tenants: usize,
    pub pending_payments: usize,
    /// Sum of verified payments
    pub total_revenue: f64,
    pub pending_service_requests: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueAnalytics {
    pub period: String,
    pub total_revenue: f64,
    pub monthly_data: Vec<MonthlyRevenue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyAnalytics {
    pub period: String,
    /// Percentage, 0 when there are no rooms
    pub occupancy_rate: f64,
    pub occupied_rooms: usize,
    pub total_rooms: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAnalytics {
    pub period: String,
    pub total_payments: usize,
    pub verified_payments: usize,
    pub pending_payments: usize,
    pub rejected_payments: usize,
    pub overdue_payments: usize,
    /// Verified share of all payments, as a percentage
    pub collection_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn room() -> Room {
        Room {
            id: "room-103".to_string(),
            room_number: "103".to_string(),
            floor: 1,
            room_type: RoomType::Double,
            rent: 12000.0,
            deposit: 24000.0,
            amenities: vec!["AC".to_string()],
            is_occupied: false,
            tenant_id: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_room_occupancy_invariant() {
        let mut r = room();
        assert!(r.validate().is_ok());

        r.is_occupied = true;
        assert!(r.validate().unwrap_err().contains("no tenant"));

        r.tenant_id = Some("tenant-101".to_string());
        assert!(r.validate().is_ok());

        r.is_occupied = false;
        assert!(r.validate().unwrap_err().contains("not marked occupied"));
    }

    #[test]
    fn test_room_patch_tri_state_tenant() {
        let absent: RoomPatch = serde_json::from_value(json!({ "rent": 9000 })).unwrap();
        assert_eq!(absent.tenant_id, None);

        let cleared: RoomPatch =
            serde_json::from_value(json!({ "tenantId": null, "isOccupied": false })).unwrap();
        assert_eq!(cleared.tenant_id, Some(None));

        let set: RoomPatch = serde_json::from_value(json!({ "tenantId": "tenant-102" })).unwrap();
        assert_eq!(set.tenant_id, Some(Some("tenant-102".to_string())));

        assert_eq!(
            serde_json::to_value(RoomPatch::vacate()).unwrap(),
            json!({ "isOccupied": false, "tenantId": null })
        );
    }

    #[test]
    fn test_room_patch_apply() {
        let mut r = room();
        RoomPatch::assign("tenant-101").apply_to(&mut r);

        assert!(r.is_occupied);
        assert_eq!(r.tenant_id.as_deref(), Some("tenant-101"));
        assert!(r.validate().is_ok());

        RoomPatch::vacate().apply_to(&mut r);
        assert!(!r.is_occupied);
        assert_eq!(r.tenant_id, None);
    }

    #[test]
    fn test_payment_status_transitions() {
        use PaymentStatus::*;

        assert!(Pending.can_transition_to(Verified));
        assert!(Pending.can_transition_to(Overdue));
        assert!(Overdue.can_transition_to(Verified));
        assert!(Overdue.can_transition_to(Rejected));
        assert!(Verified.can_transition_to(Verified));

        assert!(!Verified.can_transition_to(Pending));
        assert!(!Rejected.can_transition_to(Verified));
        assert!(!Overdue.can_transition_to(Pending));
    }

    #[test]
    fn test_service_request_status_transitions() {
        use ServiceRequestStatus::*;

        assert!(Pending.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Completed.can_transition_to(Completed));

        assert!(!InProgress.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!Cancelled.can_transition_to(Completed));
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_value(ServiceRequestStatus::InProgress).unwrap(),
            json!("in-progress")
        );
        assert_eq!(
            serde_json::to_value(PaymentMethod::BankTransfer).unwrap(),
            json!("bank_transfer")
        );
        assert_eq!(ServiceRequestStatus::parse("in-progress"), Some(ServiceRequestStatus::InProgress));
        assert_eq!(ServiceRequestStatus::parse("done"), None);
    }

    #[test]
    fn test_authenticated_user_is_flattened() {
        let user = AuthenticatedUser {
            user: User {
                uid: "owner-1".to_string(),
                email: "owner@example.com".to_string(),
                role: UserRole::Owner,
                room_number: None,
                is_onboarding_complete: true,
            },
            token: "mock-token-owner-1".to_string(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(
            value,
            json!({
                "uid": "owner-1",
                "email": "owner@example.com",
                "role": "owner",
                "isOnboardingComplete": true,
                "token": "mock-token-owner-1"
            })
        );

        let back: AuthenticatedUser = serde_json::from_value(value).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_new_payment_validation() {
        let mut payment = NewPayment {
            tenant_id: "tenant-101".to_string(),
            room_number: "101".to_string(),
            amount: 8000.0,
            payment_type: PaymentType::Rent,
            month: "2024-02".to_string(),
            payment_method: PaymentMethod::Upi,
            transaction_id: None,
            receipt_url: None,
        };
        assert!(payment.validate().is_ok());

        payment.amount = 0.0;
        assert!(payment.validate().is_err());
    }

    #[test]
    fn test_file_upload_debug_omits_bytes() {
        let upload = FileUpload::new("receipt.pdf", "application/pdf", vec![1, 2, 3]);
        let debug = format!("{:?}", upload);

        assert!(debug.contains("receipt.pdf"));
        assert!(debug.contains("size: 3"));
        assert_eq!(upload.size(), 3);
    }
}
