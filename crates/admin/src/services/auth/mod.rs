//! Admin authentication service.
//!
//! Username and password login against Argon2id hashes stored in
//! `admin_users.password_hash`. Usernames are case-insensitive (stored
//! lower-case); passwords are case-sensitive.

mod error;

pub use error::AdminAuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use esep_core::AdminUserId;

use crate::db::RepositoryError;
use crate::db::admin_users::{AdminCredentials, AdminUserRepository};
use crate::models::admin_user::{AdminUser, AdminUserDraft, normalize_username};

/// Argon2id hash of no real password, with the default cost parameters.
///
/// Verified against when the account is unknown or inactive so those
/// attempts take as long as a wrong password.
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZXNlcC1kdW1teS1zYWx0IQ$ZXNlcC1kdW1teS1oYXNoLW5ldmVyLW1hdGNoZXMhISE";

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    users: AdminUserRepository<'a>,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: AdminUserRepository::new(pool),
        }
    }

    /// Check a username and password.
    ///
    /// On success `last_login` is stamped (best effort) and the account is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidCredentials` if the account is unknown,
    /// inactive, or the password does not match.
    pub async fn login(&self, username: &str, password: &str) -> Result<AdminUser, AdminAuthError> {
        let username = normalize_username(username);
        if username.is_empty() || password.is_empty() {
            return Err(AdminAuthError::InvalidCredentials);
        }

        let credentials = self.users.find_credentials(&username).await?;
        let user = check_credentials(credentials, password)?;

        if let Err(e) = self.users.record_login(user.id).await {
            tracing::warn!(admin_id = %user.id, error = %e, "Failed to record last login");
        }
        Ok(user)
    }

    /// Create a new admin account from a validated draft.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::UserAlreadyExists` if the username is taken.
    pub async fn create_admin(&self, draft: &AdminUserDraft) -> Result<AdminUserId, AdminAuthError> {
        let password_hash = hash_password(draft.password.expose_secret())?;

        self.users
            .create(&draft.username, &password_hash, draft.role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AdminAuthError::UserAlreadyExists,
                other => AdminAuthError::Repository(other),
            })
    }

    /// Replace the password of an existing account.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::UserNotFound` if no account has this username.
    pub async fn set_password(&self, username: &str, password: &str) -> Result<(), AdminAuthError> {
        let password_hash = hash_password(password)?;

        self.users
            .set_password_hash(&normalize_username(username), &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AdminAuthError::UserNotFound,
                other => AdminAuthError::Repository(other),
            })
    }
}

/// Decide a login attempt from the stored account, if any.
///
/// A password hash is verified on every path.
///
/// # Errors
///
/// Returns `AdminAuthError::InvalidCredentials` if the account is missing,
/// inactive, or the password does not match.
pub fn check_credentials(
    credentials: Option<AdminCredentials>,
    password: &str,
) -> Result<AdminUser, AdminAuthError> {
    let Some(credentials) = credentials else {
        tracing::debug!("Login for unknown admin");
        let _ = verify_password(password, DUMMY_PASSWORD_HASH);
        return Err(AdminAuthError::InvalidCredentials);
    };

    if !credentials.user.is_active {
        tracing::debug!(username = %credentials.user.username, "Login for inactive admin");
        let _ = verify_password(password, DUMMY_PASSWORD_HASH);
        return Err(AdminAuthError::InvalidCredentials);
    }

    verify_password(password, &credentials.password_hash)?;
    Ok(credentials.user)
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AdminAuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AdminAuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AdminAuthError::PasswordHash)
}

/// Verify a password against a stored PHC hash string.
///
/// # Errors
///
/// Returns `AdminAuthError::InvalidCredentials` on mismatch or an
/// unparseable hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AdminAuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AdminAuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AdminAuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use esep_core::AdminRole;
    use uuid::Uuid;

    use super::*;

    fn credentials(password: &str, is_active: bool) -> AdminCredentials {
        AdminCredentials {
            user: AdminUser {
                id: AdminUserId::new(Uuid::new_v4()),
                username: "clerk".to_string(),
                role: AdminRole::LocalAdmin,
                is_active,
                last_login: None,
                created_at: Utc::now(),
            },
            password_hash: hash_password(password).unwrap(),
        }
    }

    #[test]
    fn test_dummy_hash_is_well_formed() {
        let parsed = PasswordHash::new(DUMMY_PASSWORD_HASH).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert!(parsed.hash.is_some());
    }

    #[test]
    fn test_active_account_with_right_password() {
        let user = check_credentials(Some(credentials("Kerala@2024", true)), "Kerala@2024").unwrap();
        assert_eq!(user.username, "clerk");
    }

    #[test]
    fn test_wrong_password_rejected() {
        assert!(matches!(
            check_credentials(Some(credentials("Kerala@2024", true)), "Kerala@2025"),
            Err(AdminAuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_inactive_account_rejected_even_with_right_password() {
        assert!(matches!(
            check_credentials(Some(credentials("Kerala@2024", false)), "Kerala@2024"),
            Err(AdminAuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_unknown_account_rejected() {
        assert!(matches!(
            check_credentials(None, "Kerala@2024"),
            Err(AdminAuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("Kerala@2024").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Kerala@2024", &hash).is_ok());
    }

    #[test]
    fn test_password_is_case_sensitive() {
        let hash = hash_password("Kerala@2024").unwrap();
        assert!(matches!(
            verify_password("kerala@2024", &hash),
            Err(AdminAuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("anything", "plaintext-from-old-system"),
            Err(AdminAuthError::InvalidCredentials)
        ));
    }
}
