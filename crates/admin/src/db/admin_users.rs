//! Admin user repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use esep_core::{AdminRole, AdminUserId};

use super::RepositoryError;
use crate::models::AdminUser;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: AdminUserId,
    username: String,
    role: String,
    is_active: bool,
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AdminUserRow> for AdminUser {
    type Error = RepositoryError;

    fn try_from(row: AdminUserRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<AdminRole>().map_err(|e| {
            RepositoryError::DataCorruption(format!("admin {}: {e}", row.username))
        })?;

        Ok(Self {
            id: row.id,
            username: row.username,
            role,
            is_active: row.is_active,
            last_login: row.last_login,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: AdminUserRow,
    password_hash: String,
}

/// An account together with its stored password hash, for login checks only.
#[derive(Debug)]
pub struct AdminCredentials {
    pub user: AdminUser,
    pub password_hash: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for admin user database operations.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all admin users, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored role is unknown.
    pub async fn list_all(&self) -> Result<Vec<AdminUser>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminUserRow>(
            r"
            SELECT id, username, role, is_active, last_login, created_at
            FROM admin_users
            ORDER BY created_at
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Look up an account and its hash by (already normalised) username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<AdminCredentials>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r"
            SELECT id, username, role, is_active, last_login, created_at, password_hash
            FROM admin_users
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        row.map(|row| {
            Ok(AdminCredentials {
                user: row.user.try_into()?,
                password_hash: row.password_hash,
            })
        })
        .transpose()
    }

    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        role: AdminRole,
    ) -> Result<AdminUserId, RepositoryError> {
        let id = sqlx::query_scalar(
            r"
            INSERT INTO admin_users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(username)
        .bind(password_hash)
        .bind(role.to_string())
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was updated.
    pub async fn set_active(&self, id: AdminUserId, is_active: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE admin_users SET is_active = $2 WHERE id = $1")
            .bind(id)
            .bind(is_active)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no account has this username.
    pub async fn set_password_hash(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE admin_users SET password_hash = $2 WHERE username = $1")
            .bind(username)
            .bind(password_hash)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Stamp `last_login` with the current time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn record_login(&self, id: AdminUserId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE admin_users SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
