use crate::error::AuthError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who a signed-in user is to the property.
///
/// # Examples
///
/// ```
/// use core_auth::UserRole;
///
/// let role: UserRole = "owner".parse().unwrap();
/// assert_eq!(role, UserRole::Owner);
/// assert_eq!(role.to_string(), "owner");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Tenant,
    Owner,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Tenant => "tenant",
            UserRole::Owner => "owner",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tenant" => Ok(UserRole::Tenant),
            "owner" => Ok(UserRole::Owner),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }
}

/// Tenant sign-in: room number plus the Aadhaar number on file.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantCredentials {
    pub room_number: String,
    pub aadhaar_number: String,
}

impl TenantCredentials {
    pub fn new(room_number: impl Into<String>, aadhaar_number: impl Into<String>) -> Self {
        Self {
            room_number: room_number.into(),
            aadhaar_number: aadhaar_number.into(),
        }
    }
}

// Identity numbers never reach logs
impl fmt::Debug for TenantCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantCredentials")
            .field("room_number", &self.room_number)
            .field("aadhaar_number", &"[REDACTED]")
            .finish()
    }
}

/// Owner sign-in by email and password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerCredentials {
    pub email: String,
    pub password: String,
}

impl OwnerCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for OwnerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnerCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_str() {
        assert_eq!("tenant".parse::<UserRole>().unwrap(), UserRole::Tenant);
        assert_eq!(UserRole::Owner.as_str(), "owner");
        assert!(matches!(
            "admin".parse::<UserRole>(),
            Err(AuthError::UnknownRole(role)) if role == "admin"
        ));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Tenant).unwrap(), "\"tenant\"");
    }

    #[test]
    fn test_tenant_credentials_wire_names() {
        let creds = TenantCredentials::new("101", "1234-5678-9012");
        let json = serde_json::to_value(&creds).unwrap();

        assert_eq!(json["roomNumber"], "101");
        assert_eq!(json["aadhaarNumber"], "1234-5678-9012");
    }

    #[test]
    fn test_credentials_debug_hides_secrets() {
        let tenant = format!("{:?}", TenantCredentials::new("101", "1234-5678-9012"));
        let owner = format!("{:?}", OwnerCredentials::new("owner@example.com", "password"));

        assert!(!tenant.contains("1234"));
        assert!(tenant.contains("101"));
        assert!(!owner.contains("\"password\""));
        assert!(owner.contains("owner@example.com"));
    }
}
