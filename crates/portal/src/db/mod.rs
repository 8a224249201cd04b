//! Read-mostly database access for the public portal.
//!
//! The portal reads `categories`, `panchayaths` and `announcements`, and
//! inserts into `registrations`. The schema is owned by the admin crate's
//! migrations.

pub mod announcements;
pub mod catalog;
pub mod panchayaths;
pub mod registrations;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use announcements::AnnouncementRepository;
pub use catalog::CatalogRepository;
pub use panchayaths::PanchayathRepository;
pub use registrations::RegistrationRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("data corruption: {0}")]
    DataCorruption(String),

    #[error("not found")]
    NotFound,

    /// Unique constraint violation (e.g., a colliding customer id).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Referenced row is missing (e.g., a panchayath deleted mid-submit).
    #[error("missing reference: {0}")]
    MissingReference(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return Self::Conflict(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return Self::MissingReference(constraint);
            }
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url.expose_secret())
        .await
}

/// # Errors
///
/// Returns `RepositoryError::Database` if the database is unreachable.
pub async fn ping(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
