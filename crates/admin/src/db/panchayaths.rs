//! Panchayath repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use esep_core::PanchayathId;

use super::RepositoryError;
use crate::models::{Panchayath, PanchayathDraft};

#[derive(Debug, sqlx::FromRow)]
struct PanchayathRow {
    id: PanchayathId,
    name: String,
    district: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PanchayathRow> for Panchayath {
    fn from(row: PanchayathRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            district: row.district,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for panchayath database operations.
pub struct PanchayathRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PanchayathRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every panchayath ordered by district, then name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Panchayath>, RepositoryError> {
        let rows = sqlx::query_as::<_, PanchayathRow>(
            r"
            SELECT id, name, district, is_active, created_at, updated_at
            FROM panchayaths
            ORDER BY district, name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no panchayath has this ID.
    pub async fn get_by_id(&self, id: PanchayathId) -> Result<Panchayath, RepositoryError> {
        sqlx::query_as::<_, PanchayathRow>(
            r"
            SELECT id, name, district, is_active, created_at, updated_at
            FROM panchayaths
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .map(Into::into)
        .ok_or(RepositoryError::NotFound)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the district already has a
    /// panchayath with this name.
    pub async fn create(&self, draft: &PanchayathDraft) -> Result<PanchayathId, RepositoryError> {
        let id = sqlx::query_scalar(
            "INSERT INTO panchayaths (name, district, is_active) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&draft.name)
        .bind(&draft.district)
        .bind(draft.is_active)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was updated.
    pub async fn update(
        &self,
        id: PanchayathId,
        draft: &PanchayathDraft,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE panchayaths
            SET name = $2, district = $3, is_active = $4, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.district)
        .bind(draft.is_active)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::InUse` if registrations still reference it.
    pub async fn delete(&self, id: PanchayathId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM panchayaths WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
