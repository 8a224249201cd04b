//! Live announcements for the portal front page.

use chrono::NaiveDate;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::PublicAnnouncement;

pub struct AnnouncementRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnnouncementRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Active announcements whose expiry date is today or later, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_live(&self, today: NaiveDate) -> Result<Vec<PublicAnnouncement>, RepositoryError> {
        let rows = sqlx::query_as::<_, PublicAnnouncement>(
            r"
            SELECT id, title, content, expiry_date
            FROM announcements
            WHERE is_active AND (expiry_date IS NULL OR expiry_date >= $1)
            ORDER BY created_at DESC
            ",
        )
        .bind(today)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
