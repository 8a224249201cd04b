//! Active categories for the public catalog.

use rust_decimal::Decimal;
use sqlx::PgPool;

use esep_core::{CategoryId, Fee, Pricing};

use super::RepositoryError;
use crate::models::CatalogCategory;

#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    id: CategoryId,
    name: String,
    actual_fee: Decimal,
    offer_fee: Decimal,
    popup_image_url: Option<String>,
    is_highlighted: bool,
}

impl TryFrom<CatalogRow> for CatalogCategory {
    type Error = RepositoryError;

    fn try_from(row: CatalogRow) -> Result<Self, Self::Error> {
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
            is_highlighted: row.is_highlighted,
        })
    }
}

pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Active categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<CatalogCategory>, RepositoryError> {
        let rows = sqlx::query_as::<_, CatalogRow>(
            r"
            SELECT id, name, actual_fee, offer_fee, popup_image_url, is_highlighted
            FROM categories
            WHERE is_active
            ORDER BY name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// A single category, only if it is active.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for unknown or inactive categories.
    pub async fn get_active(&self, id: CategoryId) -> Result<CatalogCategory, RepositoryError> {
        let row = sqlx::query_as::<_, CatalogRow>(
            r"
            SELECT id, name, actual_fee, offer_fee, popup_image_url, is_highlighted
            FROM categories
            WHERE id = $1 AND is_active
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }
}
