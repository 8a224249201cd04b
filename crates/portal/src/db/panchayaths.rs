//! Active panchayaths for the registration form.

use sqlx::PgPool;

use esep_core::PanchayathId;

use super::RepositoryError;
use crate::models::PanchayathOption;

pub struct PanchayathRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PanchayathRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<PanchayathOption>, RepositoryError> {
        let rows = sqlx::query_as::<_, PanchayathOption>(
            "SELECT id, name, district FROM panchayaths WHERE is_active ORDER BY district, name",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Whether `id` names an active panchayath.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn is_active(&self, id: PanchayathId) -> Result<bool, RepositoryError> {
        let active = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM panchayaths WHERE id = $1 AND is_active)",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;
        Ok(active)
    }
}
