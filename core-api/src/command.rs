//! Logical API calls and their HTTP endpoints
//!
//! [`ApiCommand`] is the single routing table of the client: every command
//! knows the verb, path, query and JSON body it uses on the network, and
//! [`ApiCommand::from_route`] parses the same table in reverse for raw
//! requests.

use crate::error::{ApiError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bridge_traits::HttpMethod;
use core_auth::{OwnerCredentials, TenantCredentials};
use core_library::{
    BulkNotification, FileUpload, NewNotification, NewPayment, NewRoom, NewServiceRequest,
    PageQuery, PaymentStatus, RoomPatch, ServiceRequestStatus, TenantProfilePatch,
};
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use url::Url;

const DEFAULT_EXPORT_FORMAT: &str = "csv";

/// Scratch origin for assembling encoded paths.
const PATH_ROOT: &str = "http://localhost/";

/// One logical backend call with its typed parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCommand {
    // Auth
    Login(TenantCredentials),
    LoginOwner(OwnerCredentials),
    Logout,
    RefreshToken,

    // Tenants
    GetTenantProfile { tenant_id: String },
    UpdateTenantProfile { tenant_id: String, patch: TenantProfilePatch },
    CompleteTenantOnboarding { tenant_id: String, patch: TenantProfilePatch },
    UploadTenantDocument { tenant_id: String, file: FileUpload, kind: String },
    GetAllTenants(PageQuery),
    GetTenantById { tenant_id: String },
    UpdateTenantByOwner { tenant_id: String, patch: TenantProfilePatch },
    DeleteTenant { tenant_id: String },

    // Rooms
    GetAllRooms,
    GetRoomById { room_id: String },
    CreateRoom(NewRoom),
    UpdateRoom { room_id: String, patch: RoomPatch },
    DeleteRoom { room_id: String },
    AssignTenantToRoom { room_id: String, tenant_id: String },
    RemoveTenantFromRoom { room_id: String },

    // Payments
    SubmitPayment(NewPayment),
    GetTenantPayments { tenant_id: String },
    GetAllPayments(PageQuery),
    UpdatePaymentStatus { payment_id: String, status: PaymentStatus },
    VerifyPayment { payment_id: String, verified: bool },

    // Service requests
    CreateServiceRequest(NewServiceRequest),
    GetTenantServiceRequests { tenant_id: String },
    GetAllServiceRequests(PageQuery),
    UpdateServiceRequestStatus { request_id: String, status: ServiceRequestStatus },
    AddServiceRequestNote { request_id: String, note: String },

    // Notifications
    GetNotifications { user_id: String },
    MarkNotificationAsRead { notification_id: String },
    MarkAllNotificationsAsRead { user_id: String },
    SendNotification(NewNotification),
    SendBulkNotifications(BulkNotification),

    // Analytics and export
    GetDashboardStats,
    GetRevenueAnalytics { period: String },
    GetOccupancyAnalytics { period: String },
    GetPaymentAnalytics { period: String },
    ExportData { kind: String, format: Option<String> },

    // Files
    UploadFile { file: FileUpload, kind: String, metadata: Option<Value> },
    DeleteFile { file_id: String },
}

/// Where and how a command travels on the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub method: HttpMethod,
    /// Path below the API base address, starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Endpoint {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Joins `segments` below the base address, percent-encoding each one.
    fn at(method: HttpMethod, segments: &[&str]) -> Result<Self> {
        let mut url = Url::parse(PATH_ROOT)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidRequest("URL cannot carry a path".to_string()))?
            .extend(segments);
        Ok(Self::new(method, url.path()))
    }

    fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    fn param(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    fn body<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Absolute URL under `base_url`, with the query string encoded.
    pub fn url(&self, base_url: &str) -> Result<String> {
        let mut url = Url::parse(&format!("{}{}", base_url.trim_end_matches('/'), self.path))
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid URL: {}", e)))?;

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }

        Ok(url.into())
    }
}

/// Why a raw route did not turn into a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// No command uses this verb and path
    Unmatched,
    /// The route matched but its body or query could not be read
    Invalid(String),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::Unmatched => f.write_str("no matching route"),
            RouteError::Invalid(reason) => write!(f, "invalid request: {}", reason),
        }
    }
}

// Small request bodies

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignBody {
    tenant_id: String,
}

#[derive(Serialize, Deserialize)]
struct StatusBody<S> {
    status: S,
}

#[derive(Serialize, Deserialize)]
struct VerifyBody {
    verified: bool,
}

#[derive(Serialize, Deserialize)]
struct NoteBody {
    note: String,
}

/// JSON form of an upload: the file bytes travel base64-encoded.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadBody {
    name: String,
    content_type: String,
    data: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
}

impl UploadBody {
    fn encode(file: &FileUpload, kind: &str, metadata: Option<&Value>) -> Self {
        Self {
            name: file.name.clone(),
            content_type: file.content_type.clone(),
            data: BASE64.encode(&file.data),
            kind: kind.to_string(),
            metadata: metadata.cloned(),
        }
    }

    fn decode(self) -> std::result::Result<(FileUpload, String, Option<Value>), RouteError> {
        let data = BASE64
            .decode(self.data.as_bytes())
            .map_err(|e| RouteError::Invalid(format!("file data is not base64: {}", e)))?;
        Ok((
            FileUpload::new(self.name, self.content_type, data),
            self.kind,
            self.metadata,
        ))
    }
}

impl ApiCommand {
    /// Operation name used in logs and events.
    pub fn name(&self) -> &'static str {
        match self {
            ApiCommand::Login(_) => "login",
            ApiCommand::LoginOwner(_) => "login_owner",
            ApiCommand::Logout => "logout",
            ApiCommand::RefreshToken => "refresh_token",
            ApiCommand::GetTenantProfile { .. } => "get_tenant_profile",
            ApiCommand::UpdateTenantProfile { .. } => "update_tenant_profile",
            ApiCommand::CompleteTenantOnboarding { .. } => "complete_tenant_onboarding",
            ApiCommand::UploadTenantDocument { .. } => "upload_tenant_document",
            ApiCommand::GetAllTenants(_) => "get_all_tenants",
            ApiCommand::GetTenantById { .. } => "get_tenant_by_id",
            ApiCommand::UpdateTenantByOwner { .. } => "update_tenant_by_owner",
            ApiCommand::DeleteTenant { .. } => "delete_tenant",
            ApiCommand::GetAllRooms => "get_all_rooms",
            ApiCommand::GetRoomById { .. } => "get_room_by_id",
            ApiCommand::CreateRoom(_) => "create_room",
            ApiCommand::UpdateRoom { .. } => "update_room",
            ApiCommand::DeleteRoom { .. } => "delete_room",
            ApiCommand::AssignTenantToRoom { .. } => "assign_tenant_to_room",
            ApiCommand::RemoveTenantFromRoom { .. } => "remove_tenant_from_room",
            ApiCommand::SubmitPayment(_) => "submit_payment",
            ApiCommand::GetTenantPayments { .. } => "get_tenant_payments",
            ApiCommand::GetAllPayments(_) => "get_all_payments",
            ApiCommand::UpdatePaymentStatus { .. } => "update_payment_status",
            ApiCommand::VerifyPayment { .. } => "verify_payment",
            ApiCommand::CreateServiceRequest(_) => "create_service_request",
            ApiCommand::GetTenantServiceRequests { .. } => "get_tenant_service_requests",
            ApiCommand::GetAllServiceRequests(_) => "get_all_service_requests",
            ApiCommand::UpdateServiceRequestStatus { .. } => "update_service_request_status",
            ApiCommand::AddServiceRequestNote { .. } => "add_service_request_note",
            ApiCommand::GetNotifications { .. } => "get_notifications",
            ApiCommand::MarkNotificationAsRead { .. } => "mark_notification_as_read",
            ApiCommand::MarkAllNotificationsAsRead { .. } => "mark_all_notifications_as_read",
            ApiCommand::SendNotification(_) => "send_notification",
            ApiCommand::SendBulkNotifications(_) => "send_bulk_notifications",
            ApiCommand::GetDashboardStats => "get_dashboard_stats",
            ApiCommand::GetRevenueAnalytics { .. } => "get_revenue_analytics",
            ApiCommand::GetOccupancyAnalytics { .. } => "get_occupancy_analytics",
            ApiCommand::GetPaymentAnalytics { .. } => "get_payment_analytics",
            ApiCommand::ExportData { .. } => "export_data",
            ApiCommand::UploadFile { .. } => "upload_file",
            ApiCommand::DeleteFile { .. } => "delete_file",
        }
    }

    /// The network form of this command.
    pub fn endpoint(&self) -> Result<Endpoint> {
        use HttpMethod::{Delete, Get, Post, Put};

        let endpoint = match self {
            ApiCommand::Login(credentials) => {
                Endpoint::new(Post, "/auth/tenant/login").body(credentials)?
            }
            ApiCommand::LoginOwner(credentials) => {
                Endpoint::new(Post, "/auth/owner/login").body(credentials)?
            }
            ApiCommand::Logout => Endpoint::new(Post, "/auth/logout"),
            ApiCommand::RefreshToken => Endpoint::new(Post, "/auth/refresh"),

            ApiCommand::GetTenantProfile { tenant_id } => {
                Endpoint::at(Get, &["tenants", tenant_id.as_str()])?
            }
            ApiCommand::UpdateTenantProfile { tenant_id, patch } => {
                Endpoint::at(Put, &["tenants", tenant_id.as_str()])?.body(patch)?
            }
            ApiCommand::CompleteTenantOnboarding { tenant_id, patch } => {
                Endpoint::at(Post, &["tenants", tenant_id.as_str(), "onboarding"])?.body(patch)?
            }
            ApiCommand::UploadTenantDocument {
                tenant_id,
                file,
                kind,
            } => Endpoint::at(Post, &["tenants", tenant_id.as_str(), "documents"])?
                .body(&UploadBody::encode(file, kind, None))?,
            ApiCommand::GetAllTenants(query) => {
                Endpoint::new(Get, "/owner/tenants").query(query.query_pairs())
            }
            ApiCommand::GetTenantById { tenant_id } => {
                Endpoint::at(Get, &["owner", "tenants", tenant_id.as_str()])?
            }
            ApiCommand::UpdateTenantByOwner { tenant_id, patch } => {
                Endpoint::at(Put, &["owner", "tenants", tenant_id.as_str()])?.body(patch)?
            }
            ApiCommand::DeleteTenant { tenant_id } => {
                Endpoint::at(Delete, &["owner", "tenants", tenant_id.as_str()])?
            }

            ApiCommand::GetAllRooms => Endpoint::new(Get, "/owner/rooms"),
            ApiCommand::GetRoomById { room_id } => {
                Endpoint::at(Get, &["owner", "rooms", room_id.as_str()])?
            }
            ApiCommand::CreateRoom(room) => Endpoint::new(Post, "/owner/rooms").body(room)?,
            ApiCommand::UpdateRoom { room_id, patch } => {
                Endpoint::at(Put, &["owner", "rooms", room_id.as_str()])?.body(patch)?
            }
            ApiCommand::DeleteRoom { room_id } => {
                Endpoint::at(Delete, &["owner", "rooms", room_id.as_str()])?
            }
            ApiCommand::AssignTenantToRoom { room_id, tenant_id } => {
                Endpoint::at(Post, &["owner", "rooms", room_id.as_str(), "assign"])?.body(
                    &AssignBody {
                        tenant_id: tenant_id.clone(),
                    },
                )?
            }
            ApiCommand::RemoveTenantFromRoom { room_id } => {
                Endpoint::at(Post, &["owner", "rooms", room_id.as_str(), "remove-tenant"])?
            }

            ApiCommand::SubmitPayment(payment) => Endpoint::new(Post, "/payments").body(payment)?,
            ApiCommand::GetTenantPayments { tenant_id } => {
                Endpoint::at(Get, &["tenants", tenant_id.as_str(), "payments"])?
            }
            ApiCommand::GetAllPayments(query) => {
                Endpoint::new(Get, "/owner/payments").query(query.query_pairs())
            }
            ApiCommand::UpdatePaymentStatus { payment_id, status } => {
                Endpoint::at(Put, &["owner", "payments", payment_id.as_str(), "status"])?
                    .body(&StatusBody { status: *status })?
            }
            ApiCommand::VerifyPayment {
                payment_id,
                verified,
            } => Endpoint::at(Put, &["owner", "payments", payment_id.as_str(), "verify"])?
                .body(&VerifyBody {
                    verified: *verified,
                })?,

            ApiCommand::CreateServiceRequest(request) => {
                Endpoint::new(Post, "/service-requests").body(request)?
            }
            ApiCommand::GetTenantServiceRequests { tenant_id } => {
                Endpoint::at(Get, &["tenants", tenant_id.as_str(), "service-requests"])?
            }
            ApiCommand::GetAllServiceRequests(query) => {
                Endpoint::new(Get, "/owner/service-requests").query(query.query_pairs())
            }
            ApiCommand::UpdateServiceRequestStatus { request_id, status } => {
                Endpoint::at(Put, &["owner", "service-requests", request_id.as_str(), "status"])?
                    .body(&StatusBody { status: *status })?
            }
            ApiCommand::AddServiceRequestNote { request_id, note } => {
                Endpoint::at(Post, &["owner", "service-requests", request_id.as_str(), "notes"])?
                    .body(&NoteBody { note: note.clone() })?
            }

            ApiCommand::GetNotifications { user_id } => {
                Endpoint::at(Get, &["users", user_id.as_str(), "notifications"])?
            }
            ApiCommand::MarkNotificationAsRead { notification_id } => {
                Endpoint::at(Put, &["notifications", notification_id.as_str(), "read"])?
            }
            ApiCommand::MarkAllNotificationsAsRead { user_id } => {
                Endpoint::at(Put, &["users", user_id.as_str(), "notifications", "read-all"])?
            }
            ApiCommand::SendNotification(notification) => {
                Endpoint::new(Post, "/owner/notifications/send").body(notification)?
            }
            ApiCommand::SendBulkNotifications(bulk) => {
                Endpoint::new(Post, "/owner/notifications/send-bulk").body(bulk)?
            }

            ApiCommand::GetDashboardStats => Endpoint::new(Get, "/owner/analytics/dashboard"),
            ApiCommand::GetRevenueAnalytics { period } => {
                Endpoint::new(Get, "/owner/analytics/revenue").param("period", period)
            }
            ApiCommand::GetOccupancyAnalytics { period } => {
                Endpoint::new(Get, "/owner/analytics/occupancy").param("period", period)
            }
            ApiCommand::GetPaymentAnalytics { period } => {
                Endpoint::new(Get, "/owner/analytics/payments").param("period", period)
            }
            ApiCommand::ExportData { kind, format } => {
                Endpoint::at(Post, &["owner", "export", kind.as_str()])?.param(
                    "format",
                    format.as_deref().unwrap_or(DEFAULT_EXPORT_FORMAT),
                )
            }

            ApiCommand::UploadFile {
                file,
                kind,
                metadata,
            } => Endpoint::new(Post, "/upload")
                .body(&UploadBody::encode(file, kind, metadata.as_ref()))?,
            ApiCommand::DeleteFile { file_id } => {
                Endpoint::at(Delete, &["files", file_id.as_str()])?
            }
        };

        Ok(endpoint)
    }

    /// Parses a verb and an endpoint path (optionally with a query string)
    /// back into a command.
    ///
    /// # Examples
    ///
    /// ```
    /// use bridge_traits::HttpMethod;
    /// use core_api::ApiCommand;
    ///
    /// let command = ApiCommand::from_route(HttpMethod::Get, "/owner/rooms/room-101", None).unwrap();
    /// assert_eq!(command, ApiCommand::GetRoomById { room_id: "room-101".to_string() });
    /// ```
    pub fn from_route(
        method: HttpMethod,
        route: &str,
        body: Option<&Value>,
    ) -> std::result::Result<Self, RouteError> {
        use HttpMethod::{Delete, Get, Post, Put};

        let (path, query) = split_route(route);
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        let command = match (method, segments.as_slice()) {
            (Post, ["auth", "tenant", "login"]) => ApiCommand::Login(read_body(body)?),
            (Post, ["auth", "owner", "login"]) => ApiCommand::LoginOwner(read_body(body)?),
            (Post, ["auth", "logout"]) => ApiCommand::Logout,
            (Post, ["auth", "refresh"]) => ApiCommand::RefreshToken,

            (Get, ["tenants", tenant]) => ApiCommand::GetTenantProfile {
                tenant_id: id(tenant),
            },
            (Put, ["tenants", tenant]) => ApiCommand::UpdateTenantProfile {
                tenant_id: id(tenant),
                patch: read_body(body)?,
            },
            (Post, ["tenants", tenant, "onboarding"]) => ApiCommand::CompleteTenantOnboarding {
                tenant_id: id(tenant),
                patch: read_body(body)?,
            },
            (Post, ["tenants", tenant, "documents"]) => {
                let (file, kind, _) = read_body::<UploadBody>(body)?.decode()?;
                ApiCommand::UploadTenantDocument {
                    tenant_id: id(tenant),
                    file,
                    kind,
                }
            }
            (Get, ["tenants", tenant, "payments"]) => ApiCommand::GetTenantPayments {
                tenant_id: id(tenant),
            },
            (Get, ["tenants", tenant, "service-requests"]) => {
                ApiCommand::GetTenantServiceRequests {
                    tenant_id: id(tenant),
                }
            }

            (Get, ["owner", "tenants"]) => ApiCommand::GetAllTenants(page_query(query)?),
            (Get, ["owner", "tenants", tenant]) => ApiCommand::GetTenantById {
                tenant_id: id(tenant),
            },
            (Put, ["owner", "tenants", tenant]) => ApiCommand::UpdateTenantByOwner {
                tenant_id: id(tenant),
                patch: read_body(body)?,
            },
            (Delete, ["owner", "tenants", tenant]) => ApiCommand::DeleteTenant {
                tenant_id: id(tenant),
            },

            (Get, ["owner", "rooms"]) => ApiCommand::GetAllRooms,
            (Post, ["owner", "rooms"]) => ApiCommand::CreateRoom(read_body(body)?),
            (Get, ["owner", "rooms", room]) => ApiCommand::GetRoomById { room_id: id(room) },
            (Put, ["owner", "rooms", room]) => ApiCommand::UpdateRoom {
                room_id: id(room),
                patch: read_body(body)?,
            },
            (Delete, ["owner", "rooms", room]) => ApiCommand::DeleteRoom { room_id: id(room) },
            (Post, ["owner", "rooms", room, "assign"]) => ApiCommand::AssignTenantToRoom {
                room_id: id(room),
                tenant_id: read_body::<AssignBody>(body)?.tenant_id,
            },
            (Post, ["owner", "rooms", room, "remove-tenant"]) => {
                ApiCommand::RemoveTenantFromRoom { room_id: id(room) }
            }

            (Post, ["payments"]) => ApiCommand::SubmitPayment(read_body(body)?),
            (Get, ["owner", "payments"]) => ApiCommand::GetAllPayments(page_query(query)?),
            (Put, ["owner", "payments", payment, "status"]) => ApiCommand::UpdatePaymentStatus {
                payment_id: id(payment),
                status: read_body::<StatusBody<PaymentStatus>>(body)?.status,
            },
            (Put, ["owner", "payments", payment, "verify"]) => ApiCommand::VerifyPayment {
                payment_id: id(payment),
                verified: read_body::<VerifyBody>(body)?.verified,
            },

            (Post, ["service-requests"]) => ApiCommand::CreateServiceRequest(read_body(body)?),
            (Get, ["owner", "service-requests"]) => {
                ApiCommand::GetAllServiceRequests(page_query(query)?)
            }
            (Put, ["owner", "service-requests", request, "status"]) => {
                ApiCommand::UpdateServiceRequestStatus {
                    request_id: id(request),
                    status: read_body::<StatusBody<ServiceRequestStatus>>(body)?.status,
                }
            }
            (Post, ["owner", "service-requests", request, "notes"]) => {
                ApiCommand::AddServiceRequestNote {
                    request_id: id(request),
                    note: read_body::<NoteBody>(body)?.note,
                }
            }

            (Get, ["users", user, "notifications"]) => ApiCommand::GetNotifications {
                user_id: id(user),
            },
            (Put, ["notifications", notification, "read"]) => {
                ApiCommand::MarkNotificationAsRead {
                    notification_id: id(notification),
                }
            }
            (Put, ["users", user, "notifications", "read-all"]) => {
                ApiCommand::MarkAllNotificationsAsRead { user_id: id(user) }
            }
            (Post, ["owner", "notifications", "send"]) => {
                ApiCommand::SendNotification(read_body(body)?)
            }
            (Post, ["owner", "notifications", "send-bulk"]) => {
                ApiCommand::SendBulkNotifications(read_body(body)?)
            }

            (Get, ["owner", "analytics", "dashboard"]) => ApiCommand::GetDashboardStats,
            (Get, ["owner", "analytics", "revenue"]) => ApiCommand::GetRevenueAnalytics {
                period: required_param(&query, "period")?,
            },
            (Get, ["owner", "analytics", "occupancy"]) => ApiCommand::GetOccupancyAnalytics {
                period: required_param(&query, "period")?,
            },
            (Get, ["owner", "analytics", "payments"]) => ApiCommand::GetPaymentAnalytics {
                period: required_param(&query, "period")?,
            },
            (Post, ["owner", "export", kind]) => ApiCommand::ExportData {
                kind: id(kind),
                format: param(&query, "format"),
            },

            (Post, ["upload"]) => {
                let (file, kind, metadata) = read_body::<UploadBody>(body)?.decode()?;
                ApiCommand::UploadFile {
                    file,
                    kind,
                    metadata,
                }
            }
            (Delete, ["files", file]) => ApiCommand::DeleteFile { file_id: id(file) },

            _ => return Err(RouteError::Unmatched),
        };

        Ok(command)
    }
}

/// Splits `path?query` into the path and its decoded query pairs.
pub(crate) fn split_route(route: &str) -> (&str, Vec<(String, String)>) {
    let (path, query) = route.split_once('?').unwrap_or((route, ""));
    let pairs = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    (path, pairs)
}

fn id(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

fn read_body<T: DeserializeOwned>(body: Option<&Value>) -> std::result::Result<T, RouteError> {
    let body = body.cloned().unwrap_or(Value::Null);
    serde_json::from_value(body).map_err(|e| RouteError::Invalid(e.to_string()))
}

fn param(query: &[(String, String)], key: &str) -> Option<String> {
    query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

fn required_param(query: &[(String, String)], key: &str) -> std::result::Result<String, RouteError> {
    param(query, key).ok_or_else(|| RouteError::Invalid(format!("missing `{}` parameter", key)))
}

/// `page` and `limit` with their defaults; every other pair is a filter.
fn page_query(pairs: Vec<(String, String)>) -> std::result::Result<PageQuery, RouteError> {
    let mut query = PageQuery::default();

    for (key, value) in pairs {
        match key.as_str() {
            "page" => query.page = parse_number(&key, &value)?,
            "limit" => query.limit = parse_number(&key, &value)?,
            _ => query = query.filter(key, value),
        }
    }

    Ok(query)
}

fn parse_number(key: &str, value: &str) -> std::result::Result<u32, RouteError> {
    value
        .parse()
        .map_err(|_| RouteError::Invalid(format!("`{}` must be a number, got `{}`", key, value)))
}
