//! Announcement repository for database operations.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use esep_core::AnnouncementId;

use super::RepositoryError;
use crate::models::{Announcement, AnnouncementDraft};

#[derive(Debug, sqlx::FromRow)]
struct AnnouncementRow {
    id: AnnouncementId,
    title: String,
    content: String,
    expiry_date: Option<NaiveDate>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AnnouncementRow> for Announcement {
    fn from(row: AnnouncementRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            expiry_date: row.expiry_date,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for announcement database operations.
pub struct AnnouncementRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnnouncementRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every announcement, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Announcement>, RepositoryError> {
        let rows = sqlx::query_as::<_, AnnouncementRow>(
            r"
            SELECT id, title, content, expiry_date, is_active, created_at, updated_at
            FROM announcements
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no announcement has this ID.
    pub async fn get_by_id(&self, id: AnnouncementId) -> Result<Announcement, RepositoryError> {
        sqlx::query_as::<_, AnnouncementRow>(
            r"
            SELECT id, title, content, expiry_date, is_active, created_at, updated_at
            FROM announcements
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
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        draft: &AnnouncementDraft,
    ) -> Result<AnnouncementId, RepositoryError> {
        let id = sqlx::query_scalar(
            r"
            INSERT INTO announcements (title, content, expiry_date, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.expiry_date)
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
        id: AnnouncementId,
        draft: &AnnouncementDraft,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE announcements
            SET title = $2, content = $3, expiry_date = $4, is_active = $5, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.expiry_date)
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
    /// Returns `RepositoryError::NotFound` if no row was deleted.
    pub async fn delete(&self, id: AnnouncementId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
