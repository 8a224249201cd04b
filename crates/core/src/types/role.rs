//! Admin roles and the permission flags derived from them.

use serde::{Deserialize, Serialize};

/// Admin role with different permission levels.
///
/// Stored as text in `admin_users.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access including deletes and admin account management.
    SuperAdmin,
    /// Can create and edit records but not delete them.
    LocalAdmin,
    /// Read-only access to the dashboard.
    UserAdmin,
}

impl AdminRole {
    /// All roles, in descending order of privilege.
    pub const ALL: [Self; 3] = [Self::SuperAdmin, Self::LocalAdmin, Self::UserAdmin];

    /// Permission flags granted by this role.
    #[must_use]
    pub const fn permissions(self) -> Permissions {
        match self {
            Self::SuperAdmin => Permissions {
                can_read: true,
                can_write: true,
                can_delete: true,
                can_manage_admins: true,
            },
            Self::LocalAdmin => Permissions {
                can_read: true,
                can_write: true,
                can_delete: false,
                can_manage_admins: false,
            },
            Self::UserAdmin => Permissions::READ_ONLY,
        }
    }

    /// Human-readable label for templates.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Admin",
            Self::LocalAdmin => "Local Admin",
            Self::UserAdmin => "User Admin",
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::LocalAdmin => write!(f, "local_admin"),
            Self::UserAdmin => write!(f, "user_admin"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "local_admin" => Ok(Self::LocalAdmin),
            "user_admin" => Ok(Self::UserAdmin),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

/// Permission flags checked before every admin action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Permissions {
    /// May view dashboard data.
    pub can_read: bool,
    /// May create and update records.
    pub can_write: bool,
    /// May delete records.
    pub can_delete: bool,
    /// May create, list and deactivate admin accounts.
    pub can_manage_admins: bool,
}

impl Permissions {
    /// View-only access.
    pub const READ_ONLY: Self = Self {
        can_read: true,
        can_write: false,
        can_delete: false,
        can_manage_admins: false,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in AdminRole::ALL {
            assert_eq!(role.to_string().parse::<AdminRole>(), Ok(role));
        }
        assert!("admin".parse::<AdminRole>().is_err());
    }

    #[test]
    fn test_super_admin_has_everything() {
        let p = AdminRole::SuperAdmin.permissions();
        assert!(p.can_read && p.can_write && p.can_delete && p.can_manage_admins);
    }

    #[test]
    fn test_local_admin_cannot_delete() {
        let p = AdminRole::LocalAdmin.permissions();
        assert!(p.can_write);
        assert!(!p.can_delete);
        assert!(!p.can_manage_admins);
    }

    #[test]
    fn test_user_admin_is_read_only() {
        assert_eq!(AdminRole::UserAdmin.permissions(), Permissions::READ_ONLY);
    }

    #[test]
    fn test_role_serde_matches_display() {
        let json = serde_json::to_string(&AdminRole::LocalAdmin).unwrap_or_default();
        assert_eq!(json, "\"local_admin\"");
    }
}
