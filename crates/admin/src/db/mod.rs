//! Database operations for the ESEP `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `categories` - Registration categories and their fees
//! - `panchayaths` - Local administrative regions
//! - `registrations` - Citizen registrations (FK to both of the above)
//! - `admin_users` - Admin accounts with Argon2id password hashes
//! - `announcements` - Notices shown on the public portal
//! - `tower_sessions.session` - Server-side admin sessions
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p esep-cli -- migrate
//! ```

pub mod admin_users;
pub mod announcements;
pub mod categories;
pub mod dashboard;
pub mod panchayaths;
pub mod registrations;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admin_users::AdminUserRepository;
pub use announcements::AnnouncementRepository;
pub use categories::CategoryRepository;
pub use dashboard::DashboardStats;
pub use panchayaths::PanchayathRepository;
pub use registrations::{RegistrationFilter, RegistrationRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation (e.g., duplicate category name).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Row is still referenced by another table (e.g., a category with registrations).
    #[error("still referenced: {0}")]
    InUse(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_foreign_key_violation() {
                return Self::InUse(constraint);
            }
            if db_err.is_unique_violation() {
                return Self::Conflict(constraint);
            }
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_stays_database_error() {
        let err = RepositoryError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepositoryError::Database(_)));
    }

    #[test]
    fn test_in_use_display() {
        let err = RepositoryError::InUse("registrations_category_id_fkey".to_string());
        assert_eq!(
            err.to_string(),
            "still referenced: registrations_category_id_fkey"
        );
    }
}
