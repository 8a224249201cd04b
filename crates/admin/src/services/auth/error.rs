//! Admin authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Unknown username, inactive account or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Admin user already exists.
    #[error("admin user already exists")]
    UserAlreadyExists,

    /// Admin user not found.
    #[error("admin user not found")]
    UserNotFound,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
