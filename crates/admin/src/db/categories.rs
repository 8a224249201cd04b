//! Category repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use esep_core::{CategoryId, Fee, Pricing};

use super::RepositoryError;
use crate::models::{Category, CategoryDraft};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    actual_fee: Decimal,
    offer_fee: Decimal,
    popup_image_url: Option<String>,
    is_active: bool,
    is_highlighted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = RepositoryError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        if row.actual_fee.is_sign_negative() || row.offer_fee.is_sign_negative() {
            return Err(RepositoryError::DataCorruption(format!(
                "negative fee on category {}",
                row.id
            )));
        }

        Ok(Self {
            id: row.id,
            name: row.name,
            pricing: Pricing::new(Fee::new(row.actual_fee), Fee::new(row.offer_fee)),
            popup_image_url: row.popup_image_url,
            is_active: row.is_active,
            is_highlighted: row.is_highlighted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, name, actual_fee, offer_fee, popup_image_url, \
     is_active, is_highlighted, created_at, updated_at FROM categories";

// =============================================================================
// Repository
// =============================================================================

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every category ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!("{SELECT_COLUMNS} ORDER BY name"))
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no category has this ID.
    pub async fn get_by_id(&self, id: CategoryId) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Insert a new category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    pub async fn create(&self, draft: &CategoryDraft) -> Result<CategoryId, RepositoryError> {
        let id: CategoryId = sqlx::query_scalar(
            r"
            INSERT INTO categories
                (name, actual_fee, offer_fee, popup_image_url, is_active, is_highlighted)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(&draft.name)
        .bind(draft.pricing.actual.amount())
        .bind(draft.pricing.offer.amount())
        .bind(draft.popup_image_url.as_deref())
        .bind(draft.is_active)
        .bind(draft.is_highlighted)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Update a category and stamp `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was updated.
    pub async fn update(&self, id: CategoryId, draft: &CategoryDraft) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE categories
            SET name = $2, actual_fee = $3, offer_fee = $4, popup_image_url = $5,
                is_active = $6, is_highlighted = $7, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(draft.pricing.actual.amount())
        .bind(draft.pricing.offer.amount())
        .bind(draft.popup_image_url.as_deref())
        .bind(draft.is_active)
        .bind(draft.is_highlighted)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InUse` if registrations still reference it.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
