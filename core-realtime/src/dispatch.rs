//! Maps updates to UI effects
//!
//! [`dispatch`] is pure: it only looks at the event and who is watching, and
//! describes what the host should do. Toasts are role or recipient gated;
//! every data-bearing update also asks for a refresh.

use crate::message::UpdateEvent;
use core_auth::UserRole;
use core_library::ServiceRequestStatus;
use core_runtime::events::{EventSeverity, ToastLevel, UiEffect};

/// The signed-in user a session delivers updates to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: String,
    pub role: UserRole,
}

impl Viewer {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    fn is_owner(&self) -> bool {
        self.role == UserRole::Owner
    }

    fn is(&self, user_id: Option<&str>) -> bool {
        user_id == Some(self.user_id.as_str())
    }
}

pub fn dispatch(event: &UpdateEvent, viewer: &Viewer) -> Vec<UiEffect> {
    let mut effects = Vec::new();

    match event {
        UpdateEvent::TenantCreated { room_number } => {
            effects.push(UiEffect::toast(
                ToastLevel::Success,
                format!("New tenant registered: Room {}", room(room_number)),
            ));
            effects.push(UiEffect::Refresh);
        }
        UpdateEvent::TenantUpdated { room_number } => {
            if viewer.is_owner() {
                effects.push(UiEffect::toast(
                    ToastLevel::Info,
                    format!("Tenant updated: Room {}", room(room_number)),
                ));
            }
            effects.push(UiEffect::Refresh);
        }
        UpdateEvent::PaymentSubmitted {
            room_number,
            amount,
            tenant_id,
        } => {
            if viewer.is_owner() {
                effects.push(UiEffect::toast(
                    ToastLevel::Info,
                    format!(
                        "New payment from Room {}: ₹{}",
                        room(room_number),
                        amount.map(format_amount).unwrap_or_else(|| "unknown".to_string())
                    ),
                ));
            } else if viewer.is(tenant_id.as_deref()) {
                effects.push(UiEffect::toast(
                    ToastLevel::Success,
                    "Payment submitted successfully",
                ));
            }
            effects.push(UiEffect::Refresh);
        }
        UpdateEvent::PaymentVerified { tenant_id } => {
            if viewer.is(tenant_id.as_deref()) {
                effects.push(UiEffect::toast(
                    ToastLevel::Success,
                    "Your payment has been verified",
                ));
            }
            effects.push(UiEffect::Refresh);
        }
        UpdateEvent::PaymentRejected { tenant_id } => {
            if viewer.is(tenant_id.as_deref()) {
                effects.push(UiEffect::toast(
                    ToastLevel::Error,
                    "Your payment was rejected. Please contact the owner.",
                ));
            }
            effects.push(UiEffect::Refresh);
        }
        UpdateEvent::ServiceRequestCreated {
            room_number,
            tenant_id,
        } => {
            if viewer.is_owner() {
                effects.push(UiEffect::toast(
                    ToastLevel::Info,
                    format!("New service request from Room {}", room(room_number)),
                ));
            } else if viewer.is(tenant_id.as_deref()) {
                effects.push(UiEffect::toast(
                    ToastLevel::Success,
                    "Service request submitted successfully",
                ));
            }
            effects.push(UiEffect::Refresh);
        }
        UpdateEvent::ServiceRequestUpdated { tenant_id, status } => {
            if viewer.is(tenant_id.as_deref()) {
                if let Some(message) = status.and_then(status_message) {
                    effects.push(UiEffect::toast(ToastLevel::Info, message));
                }
            }
            effects.push(UiEffect::Refresh);
        }
        UpdateEvent::RoomUpdated { room_number } => {
            if viewer.is_owner() {
                effects.push(UiEffect::toast(
                    ToastLevel::Info,
                    format!("Room {} updated", room(room_number)),
                ));
            }
            effects.push(UiEffect::Refresh);
        }
        UpdateEvent::Notification {
            message,
            user_id,
            broadcast,
        } => {
            if viewer.is(user_id.as_deref()) || *broadcast {
                if let Some(message) = message {
                    effects.push(UiEffect::toast(ToastLevel::Info, message.clone()));
                }
            }
            effects.push(UiEffect::Refresh);
        }
        UpdateEvent::SystemMaintenance => {
            effects.push(UiEffect::toast(
                ToastLevel::Warning,
                "System maintenance scheduled. Please save your work.",
            ));
        }
        UpdateEvent::ConnectionEstablished => {
            effects.push(UiEffect::log(
                EventSeverity::Info,
                "Real-time connection established",
            ));
        }
        UpdateEvent::Unknown(kind) => {
            effects.push(UiEffect::log(
                EventSeverity::Warning,
                format!("Unknown real-time update type: {kind}"),
            ));
        }
    }

    effects
}

fn room(room_number: &Option<String>) -> &str {
    room_number.as_deref().unwrap_or("unknown")
}

fn status_message(status: ServiceRequestStatus) -> Option<&'static str> {
    match status {
        ServiceRequestStatus::InProgress => Some("Your service request is now in progress"),
        ServiceRequestStatus::Completed => Some("Your service request has been completed"),
        ServiceRequestStatus::Cancelled => Some("Your service request has been cancelled"),
        ServiceRequestStatus::Pending => None,
    }
}

/// Whole amounts print without a fraction.
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{amount:.0}")
    } else {
        amount.to_string()
    }
}
