//! Inbound update decoding
//!
//! The socket delivers `{type, data, timestamp, userId?}` objects. `type`
//! selects the [`UpdateEvent`] variant and the fields each variant needs are
//! read out of `data`. Missing or oddly typed payload fields are tolerated;
//! only a frame that is not a JSON object with a string `type` is rejected.

use crate::error::{RealtimeError, Result};
use core_library::ServiceRequestStatus;
use serde::Deserialize;
use serde_json::{Map, Value};

/// A decoded update together with its envelope fields.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateEnvelope {
    pub event: UpdateEvent,
    pub timestamp: Option<String>,
    /// Originating user, when the server names one.
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateEvent {
    TenantCreated {
        room_number: Option<String>,
    },
    TenantUpdated {
        room_number: Option<String>,
    },
    PaymentSubmitted {
        room_number: Option<String>,
        amount: Option<f64>,
        tenant_id: Option<String>,
    },
    PaymentVerified {
        tenant_id: Option<String>,
    },
    PaymentRejected {
        tenant_id: Option<String>,
    },
    ServiceRequestCreated {
        room_number: Option<String>,
        tenant_id: Option<String>,
    },
    ServiceRequestUpdated {
        tenant_id: Option<String>,
        /// `None` when absent or not a known status.
        status: Option<ServiceRequestStatus>,
    },
    RoomUpdated {
        room_number: Option<String>,
    },
    Notification {
        message: Option<String>,
        user_id: Option<String>,
        broadcast: bool,
    },
    SystemMaintenance,
    ConnectionEstablished,
    /// Any other `type`, kept verbatim.
    Unknown(String),
}

impl UpdateEvent {
    /// Builds the event for `kind` from its `data` payload.
    pub fn from_parts(kind: &str, data: &Value) -> Self {
        let fields = Fields(data.as_object());

        match kind {
            "tenant_created" => UpdateEvent::TenantCreated {
                room_number: fields.text("roomNumber"),
            },
            "tenant_updated" => UpdateEvent::TenantUpdated {
                room_number: fields.text("roomNumber"),
            },
            "payment_submitted" => UpdateEvent::PaymentSubmitted {
                room_number: fields.text("roomNumber"),
                amount: fields.number("amount"),
                tenant_id: fields.text("tenantId"),
            },
            "payment_verified" => UpdateEvent::PaymentVerified {
                tenant_id: fields.text("tenantId"),
            },
            "payment_rejected" => UpdateEvent::PaymentRejected {
                tenant_id: fields.text("tenantId"),
            },
            "service_request_created" => UpdateEvent::ServiceRequestCreated {
                room_number: fields.text("roomNumber"),
                tenant_id: fields.text("tenantId"),
            },
            "service_request_updated" => UpdateEvent::ServiceRequestUpdated {
                tenant_id: fields.text("tenantId"),
                status: fields
                    .get("status")
                    .and_then(|status| ServiceRequestStatus::deserialize(status).ok()),
            },
            "room_updated" => UpdateEvent::RoomUpdated {
                room_number: fields.text("roomNumber"),
            },
            "notification" => UpdateEvent::Notification {
                message: fields.text("message"),
                user_id: fields.text("userId"),
                broadcast: fields.flag("broadcast"),
            },
            "system_maintenance" => UpdateEvent::SystemMaintenance,
            "connection_established" => UpdateEvent::ConnectionEstablished,
            other => UpdateEvent::Unknown(other.to_string()),
        }
    }

    /// The wire `type` of this event.
    pub fn kind(&self) -> &str {
        match self {
            UpdateEvent::TenantCreated { .. } => "tenant_created",
            UpdateEvent::TenantUpdated { .. } => "tenant_updated",
            UpdateEvent::PaymentSubmitted { .. } => "payment_submitted",
            UpdateEvent::PaymentVerified { .. } => "payment_verified",
            UpdateEvent::PaymentRejected { .. } => "payment_rejected",
            UpdateEvent::ServiceRequestCreated { .. } => "service_request_created",
            UpdateEvent::ServiceRequestUpdated { .. } => "service_request_updated",
            UpdateEvent::RoomUpdated { .. } => "room_updated",
            UpdateEvent::Notification { .. } => "notification",
            UpdateEvent::SystemMaintenance => "system_maintenance",
            UpdateEvent::ConnectionEstablished => "connection_established",
            UpdateEvent::Unknown(kind) => kind,
        }
    }
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(rename = "userId", default)]
    user_id: Option<String>,
}

impl UpdateEnvelope {
    /// Decodes one text frame.
    pub fn decode(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| RealtimeError::Decode(e.to_string()))?;
        Self::from_value(value)
    }

    /// Decodes an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawEnvelope =
            serde_json::from_value(value).map_err(|e| RealtimeError::Decode(e.to_string()))?;
        Ok(Self {
            event: UpdateEvent::from_parts(&raw.kind, &raw.data),
            timestamp: raw.timestamp,
            user_id: raw.user_id,
        })
    }
}

/// Lenient view over a payload object.
struct Fields<'a>(Option<&'a Map<String, Value>>);

impl Fields<'_> {
    fn get(&self, key: &str) -> Option<&Value> {
        self.0.and_then(|map| map.get(key))
    }

    /// Strings pass through; numbers and booleans are rendered.
    fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::Bool(true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_payment_update() {
        let envelope = UpdateEnvelope::decode(
            r#"{"type":"payment_submitted","data":{"roomNumber":101,"amount":8000,"tenantId":"tenant-101"},"timestamp":"2024-01-15T10:00:00.000Z","userId":"owner-1"}"#,
        )
        .unwrap();

        assert_eq!(
            envelope.event,
            UpdateEvent::PaymentSubmitted {
                room_number: Some("101".to_string()),
                amount: Some(8000.0),
                tenant_id: Some("tenant-101".to_string()),
            }
        );
        assert_eq!(envelope.user_id.as_deref(), Some("owner-1"));
        assert_eq!(envelope.event.kind(), "payment_submitted");
    }

    #[test]
    fn test_unknown_status_is_dropped() {
        let event = UpdateEvent::from_parts(
            "service_request_updated",
            &json!({ "tenantId": "tenant-101", "status": "on-hold" }),
        );
        assert_eq!(
            event,
            UpdateEvent::ServiceRequestUpdated {
                tenant_id: Some("tenant-101".to_string()),
                status: None,
            }
        );

        let event = UpdateEvent::from_parts(
            "service_request_updated",
            &json!({ "status": "in-progress" }),
        );
        assert!(matches!(
            event,
            UpdateEvent::ServiceRequestUpdated {
                status: Some(ServiceRequestStatus::InProgress),
                ..
            }
        ));
    }

    #[test]
    fn test_missing_data_is_tolerated() {
        let envelope = UpdateEnvelope::decode(r#"{"type":"room_updated"}"#).unwrap();
        assert_eq!(envelope.event, UpdateEvent::RoomUpdated { room_number: None });
        assert!(envelope.timestamp.is_none());
    }

    #[test]
    fn test_unknown_type_kept_verbatim() {
        let envelope = UpdateEnvelope::from_value(json!({ "type": "lease_signed", "data": {} })).unwrap();
        assert_eq!(envelope.event, UpdateEvent::Unknown("lease_signed".to_string()));
        assert_eq!(envelope.event.kind(), "lease_signed");
    }

    #[test]
    fn test_malformed_frames_rejected() {
        assert!(matches!(
            UpdateEnvelope::decode("not json"),
            Err(RealtimeError::Decode(_))
        ));
        assert!(matches!(
            UpdateEnvelope::decode(r#"{"data":{}}"#),
            Err(RealtimeError::Decode(_))
        ));
        assert!(matches!(
            UpdateEnvelope::decode("[1,2]"),
            Err(RealtimeError::Decode(_))
        ));
    }
}
