//! Admin user domain types.
//!
//! These types represent validated domain objects for admin authentication.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Deserialize;

use esep_core::{AdminRole, AdminUserId};

use super::{ValidationError, non_blank};

/// Minimum accepted password length for new accounts.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Maximum username length.
pub const MAX_USERNAME_LEN: usize = 50;

/// An admin user (domain type). The password hash never leaves the repository.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub username: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Canonical form of a username: trimmed and lower-cased.
///
/// Applied both when accounts are created and when credentials are checked,
/// so `" Admin "` and `"admin"` name the same account.
#[must_use]
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// New-account form (super admins only).
#[derive(Clone, Default, Deserialize)]
pub struct AdminUserForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

impl std::fmt::Debug for AdminUserForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminUserForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Validated account fields; the password is still plaintext and must be
/// hashed before storage.
#[derive(Debug)]
pub struct AdminUserDraft {
    pub username: String,
    pub password: SecretString,
    pub role: AdminRole,
}

impl AdminUserForm {
    /// # Errors
    ///
    /// Returns `MissingRequired` for blank fields, and `Invalid` for a
    /// malformed username, a short password or an unknown role.
    pub fn validate(&self) -> Result<AdminUserDraft, ValidationError> {
        let (Some(username), Some(role)) = (non_blank(&self.username), non_blank(&self.role))
        else {
            return Err(ValidationError::MissingRequired);
        };
        if self.password.is_empty() {
            return Err(ValidationError::MissingRequired);
        }

        let username = validate_username(username)?;
        validate_password(&self.password)?;
        let role = role
            .parse::<AdminRole>()
            .map_err(|e| ValidationError::invalid("Role", e))?;

        Ok(AdminUserDraft {
            username,
            password: SecretString::from(self.password.clone()),
            role,
        })
    }
}

/// Normalise and check a username.
///
/// # Errors
///
/// Returns `Invalid` when the name is too long or contains characters other
/// than ASCII letters, digits, `.`, `_` and `-`.
pub fn validate_username(raw: &str) -> Result<String, ValidationError> {
    let username = normalize_username(raw);
    if username.is_empty() {
        return Err(ValidationError::MissingRequired);
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(ValidationError::invalid(
            "Username",
            format!("must be at most {MAX_USERNAME_LEN} characters"),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(ValidationError::invalid(
            "Username",
            "may only contain letters, digits, '.', '_' and '-'",
        ));
    }
    Ok(username)
}

/// # Errors
///
/// Returns `Invalid` when the password is shorter than [`MIN_PASSWORD_LEN`].
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::invalid(
            "Password",
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}
