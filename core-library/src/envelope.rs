//! Response envelope shared by the network and the mock backend

use crate::error::LibraryError;
use serde::{Deserialize, Serialize};

/// Every call's result: a success flag plus either data or an error string.
///
/// # Examples
///
/// ```
/// use core_library::ApiResponse;
///
/// let ok = ApiResponse::ok(42);
/// assert!(ok.success);
///
/// let failed: ApiResponse<u32> = ApiResponse::fail("Room not found");
/// assert_eq!(failed.error.as_deref(), Some("Room not found"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    /// Success with no payload.
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            message: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn map<U, F>(self, f: F) -> ApiResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        ApiResponse {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            message: self.message,
        }
    }
}

impl<T> From<Result<T, LibraryError>> for ApiResponse<T> {
    fn from(result: Result<T, LibraryError>) -> Self {
        match result {
            Ok(data) => ApiResponse::ok(data),
            Err(err) => ApiResponse::fail(err.to_string()),
        }
    }
}

impl ApiResponse<()> {
    /// Envelope for calls without a payload.
    pub fn from_unit(result: Result<(), LibraryError>) -> Self {
        match result {
            Ok(()) => ApiResponse::empty(),
            Err(err) => ApiResponse::fail(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_envelope_wire_shape() {
        let envelope: ApiResponse<u32> = ApiResponse::fail("Invalid credentials");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "success": false, "error": "Invalid credentials" })
        );
    }

    #[test]
    fn test_from_library_error() {
        let envelope: ApiResponse<u32> = Err(LibraryError::not_found("Payment", "payment-9")).into();
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("Payment not found"));
    }

    #[test]
    fn test_void_envelope_omits_data() {
        let envelope = ApiResponse::from_unit(Ok(()));
        assert_eq!(serde_json::to_value(&envelope).unwrap(), json!({ "success": true }));

        let parsed: ApiResponse<()> = serde_json::from_value(json!({ "success": true })).unwrap();
        assert!(parsed.success);
        assert!(parsed.data.is_none());
    }

    #[test]
    fn test_map_keeps_flags() {
        let envelope = ApiResponse::ok(2).with_message("done").map(|n| n * 10);
        assert_eq!(envelope.data, Some(20));
        assert_eq!(envelope.message.as_deref(), Some("done"));
    }
}
