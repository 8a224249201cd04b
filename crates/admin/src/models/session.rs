//! Session-related types for admin authentication.
//!
//! Types stored in the server-side session for authentication state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use esep_core::{AdminRole, AdminUserId, Permissions};

/// Session-stored admin identity.
///
/// Serialized as `{ id, username, role, sessionId, loginTime }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: AdminUserId,
    /// Lower-case username.
    pub username: String,
    /// Role at the time of login.
    pub role: AdminRole,
    /// Random identifier for this login, distinct from the cookie value.
    pub session_id: Uuid,
    /// When the login happened.
    pub login_time: DateTime<Utc>,
}

impl CurrentAdmin {
    /// Start a fresh login descriptor.
    #[must_use]
    pub fn new(id: AdminUserId, username: String, role: AdminRole) -> Self {
        Self {
            id,
            username,
            role,
            session_id: Uuid::new_v4(),
            login_time: Utc::now(),
        }
    }

    #[must_use]
    pub const fn permissions(&self) -> Permissions {
        self.role.permissions()
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the one-shot notice shown on the next page.
    pub const NOTICE: &str = "notice";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_is_camel_case() {
        let admin = CurrentAdmin::new(
            AdminUserId::new(Uuid::nil()),
            "admin".to_string(),
            AdminRole::SuperAdmin,
        );
        let json = serde_json::to_value(&admin).unwrap();
        assert_eq!(json["username"], "admin");
        assert_eq!(json["role"], "super_admin");
        assert!(json.get("sessionId").is_some());
        assert!(json.get("loginTime").is_some());
        assert!(json.get("session_id").is_none());
    }

    #[test]
    fn test_descriptor_roundtrip() {
        let admin = CurrentAdmin::new(
            AdminUserId::new(Uuid::new_v4()),
            "clerk".to_string(),
            AdminRole::UserAdmin,
        );
        let json = serde_json::to_string(&admin).unwrap();
        let back: CurrentAdmin = serde_json::from_str(&json).unwrap();
        assert_eq!(back, admin);
        assert!(!back.permissions().can_write);
    }
}
