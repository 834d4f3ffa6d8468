//! Routes commands to the mock backend

use crate::command::ApiCommand;
use core_library::ApiResponse;
use core_mock::MockBackend;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

/// Error string of a mock answer that could not be produced.
pub const MOCK_API_ERROR: &str = "Mock API error";

/// Serves `command` from the mock backend.
///
/// The match is exhaustive, so a typed command always has a mock answer.
pub async fn dispatch(backend: &MockBackend, command: &ApiCommand) -> ApiResponse<Value> {
    debug!(operation = command.name(), "Using mock API service");

    match command {
        ApiCommand::Login(credentials) => erase(backend.login(credentials).await),
        ApiCommand::LoginOwner(credentials) => erase(backend.login_owner(credentials).await),
        ApiCommand::Logout => erase(backend.logout().await),
        ApiCommand::RefreshToken => erase(backend.refresh_token().await),

        ApiCommand::GetTenantProfile { tenant_id } => {
            erase(backend.get_tenant_profile(tenant_id).await)
        }
        ApiCommand::UpdateTenantProfile { tenant_id, patch } => {
            erase(backend.update_tenant_profile(tenant_id, patch).await)
        }
        ApiCommand::CompleteTenantOnboarding { tenant_id, patch } => {
            erase(backend.complete_tenant_onboarding(tenant_id, patch).await)
        }
        ApiCommand::UploadTenantDocument {
            tenant_id,
            file,
            kind,
        } => erase(backend.upload_tenant_document(tenant_id, file, kind).await),
        ApiCommand::GetAllTenants(query) => erase(backend.get_all_tenants(query).await),
        ApiCommand::GetTenantById { tenant_id } => erase(backend.get_tenant_by_id(tenant_id).await),
        ApiCommand::UpdateTenantByOwner { tenant_id, patch } => {
            erase(backend.update_tenant_by_owner(tenant_id, patch).await)
        }
        ApiCommand::DeleteTenant { tenant_id } => erase(backend.delete_tenant(tenant_id).await),

        ApiCommand::GetAllRooms => erase(backend.get_all_rooms().await),
        ApiCommand::GetRoomById { room_id } => erase(backend.get_room_by_id(room_id).await),
        ApiCommand::CreateRoom(room) => erase(backend.create_room(room).await),
        ApiCommand::UpdateRoom { room_id, patch } => {
            erase(backend.update_room(room_id, patch).await)
        }
        ApiCommand::DeleteRoom { room_id } => erase(backend.delete_room(room_id).await),
        ApiCommand::AssignTenantToRoom { room_id, tenant_id } => {
            erase(backend.assign_tenant_to_room(room_id, tenant_id).await)
        }
        ApiCommand::RemoveTenantFromRoom { room_id } => {
            erase(backend.remove_tenant_from_room(room_id).await)
        }

        ApiCommand::SubmitPayment(payment) => erase(backend.submit_payment(payment).await),
        ApiCommand::GetTenantPayments { tenant_id } => {
            erase(backend.get_tenant_payments(tenant_id).await)
        }
        ApiCommand::GetAllPayments(query) => erase(backend.get_all_payments(query).await),
        ApiCommand::UpdatePaymentStatus { payment_id, status } => {
            erase(backend.update_payment_status(payment_id, *status).await)
        }
        ApiCommand::VerifyPayment {
            payment_id,
            verified,
        } => erase(backend.verify_payment(payment_id, *verified).await),

        ApiCommand::CreateServiceRequest(request) => {
            erase(backend.create_service_request(request).await)
        }
        ApiCommand::GetTenantServiceRequests { tenant_id } => {
            erase(backend.get_tenant_service_requests(tenant_id).await)
        }
        ApiCommand::GetAllServiceRequests(query) => {
            erase(backend.get_all_service_requests(query).await)
        }
        ApiCommand::UpdateServiceRequestStatus { request_id, status } => {
            erase(backend.update_service_request_status(request_id, *status).await)
        }
        ApiCommand::AddServiceRequestNote { request_id, note } => {
            erase(backend.add_service_request_note(request_id, note).await)
        }

        ApiCommand::GetNotifications { user_id } => erase(backend.get_notifications(user_id).await),
        ApiCommand::MarkNotificationAsRead { notification_id } => {
            erase(backend.mark_notification_as_read(notification_id).await)
        }
        ApiCommand::MarkAllNotificationsAsRead { user_id } => {
            erase(backend.mark_all_notifications_as_read(user_id).await)
        }
        ApiCommand::SendNotification(notification) => {
            erase(backend.send_notification(notification).await)
        }
        ApiCommand::SendBulkNotifications(bulk) => {
            erase(backend.send_bulk_notifications(bulk).await)
        }

        ApiCommand::GetDashboardStats => erase(backend.get_dashboard_stats().await),
        ApiCommand::GetRevenueAnalytics { period } => {
            erase(backend.get_revenue_analytics(period).await)
        }
        ApiCommand::GetOccupancyAnalytics { period } => {
            erase(backend.get_occupancy_analytics(period).await)
        }
        ApiCommand::GetPaymentAnalytics { period } => {
            erase(backend.get_payment_analytics(period).await)
        }
        ApiCommand::ExportData { kind, format } => {
            erase(backend.export_data(kind, format.as_deref()).await)
        }

        ApiCommand::UploadFile {
            file,
            kind,
            metadata,
        } => erase(backend.upload_file(file, kind, metadata.as_ref()).await),
        ApiCommand::DeleteFile { file_id } => erase(backend.delete_file(file_id).await),
    }
}

/// Turns a typed envelope into its JSON form.
fn erase<T: Serialize>(response: ApiResponse<T>) -> ApiResponse<Value> {
    let ApiResponse {
        success,
        data,
        error: failure,
        message,
    } = response;

    match data.map(serde_json::to_value).transpose() {
        Ok(data) => ApiResponse {
            success,
            data,
            error: failure,
            message,
        },
        Err(e) => {
            error!(error = %e, "Mock API error");
            ApiResponse::fail(MOCK_API_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::SystemClock;
    use core_auth::TenantCredentials;
    use core_library::RentalStore;
    use core_runtime::config::{FeedSettings, MockLatency};
    use std::sync::Arc;

    fn backend() -> MockBackend {
        MockBackend::new(
            Arc::new(RentalStore::seeded()),
            MockLatency::none(),
            FeedSettings::mock_backend(),
            Arc::new(SystemClock),
        )
    }

    #[tokio::test]
    async fn test_dispatch_keeps_envelope_shape() {
        let backend = backend();

        let login = dispatch(
            &backend,
            &ApiCommand::Login(TenantCredentials::new("102", "2345-6789-0123")),
        )
        .await;
        assert!(login.success);
        let user = login.data.unwrap();
        assert_eq!(user["uid"], "tenant-102");
        assert_eq!(user["token"], "mock-token-tenant-102");

        let missing = dispatch(
            &backend,
            &ApiCommand::GetRoomById {
                room_id: "room-999".to_string(),
            },
        )
        .await;
        assert!(!missing.success);
        assert!(missing.data.is_none());
        assert_eq!(missing.error.as_deref(), Some("Room not found"));
    }

    #[tokio::test]
    async fn test_unit_answers_carry_no_data() {
        let response = dispatch(
            &backend(),
            &ApiCommand::MarkAllNotificationsAsRead {
                user_id: "tenant-101".to_string(),
            },
        )
        .await;

        assert!(response.success);
        assert!(response.data.is_none());
    }
}
