//! Registration repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use esep_core::{CategoryId, Fee, PanchayathId, RegistrationId, RegistrationStatus};

use super::RepositoryError;
use crate::models::Registration;

#[derive(Debug, sqlx::FromRow)]
struct RegistrationRow {
    id: RegistrationId,
    customer_id: String,
    full_name: String,
    phone: String,
    mobile_number: Option<String>,
    email: Option<String>,
    address: String,
    ward: Option<String>,
    agent_pro: Option<String>,
    category_id: CategoryId,
    category_name: String,
    panchayath_id: PanchayathId,
    panchayath_name: String,
    status: String,
    fee_paid: Option<Decimal>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RegistrationRow> for Registration {
    type Error = RepositoryError;

    fn try_from(row: RegistrationRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<RegistrationStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("registration {}: {e}", row.customer_id))
        })?;

        Ok(Self {
            id: row.id,
            customer_id: row.customer_id,
            full_name: row.full_name,
            phone: row.phone,
            mobile_number: row.mobile_number,
            email: row.email,
            address: row.address,
            ward: row.ward,
            agent_pro: row.agent_pro,
            category_id: row.category_id,
            category_name: row.category_name,
            panchayath_id: row.panchayath_id,
            panchayath_name: row.panchayath_name,
            status,
            fee_paid: row.fee_paid.map(Fee::new),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_JOINED: &str = r"
    SELECT r.id, r.customer_id, r.full_name, r.phone, r.mobile_number, r.email,
           r.address, r.ward, r.agent_pro,
           r.category_id, c.name AS category_name,
           r.panchayath_id, p.name AS panchayath_name,
           r.status, r.fee_paid, r.created_at, r.updated_at
    FROM registrations r
    JOIN categories c ON c.id = r.category_id
    JOIN panchayaths p ON p.id = r.panchayath_id
";

/// Optional filters for the registrations list. `None` means "any".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationFilter {
    pub status: Option<RegistrationStatus>,
    pub category_id: Option<CategoryId>,
    pub panchayath_id: Option<PanchayathId>,
}

/// Repository for registration database operations.
pub struct RegistrationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RegistrationRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List registrations matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is unknown.
    pub async fn list(
        &self,
        filter: RegistrationFilter,
    ) -> Result<Vec<Registration>, RepositoryError> {
        let rows = sqlx::query_as::<_, RegistrationRow>(&format!(
            r"{SELECT_JOINED}
            WHERE ($1::text IS NULL OR r.status = $1)
              AND ($2::uuid IS NULL OR r.category_id = $2)
              AND ($3::uuid IS NULL OR r.panchayath_id = $3)
            ORDER BY r.created_at DESC"
        ))
        .bind(filter.status.map(|s| s.to_string()))
        .bind(filter.category_id)
        .bind(filter.panchayath_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// The `limit` most recent registrations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent(&self, limit: i64) -> Result<Vec<Registration>, RepositoryError> {
        let rows = sqlx::query_as::<_, RegistrationRow>(&format!(
            "{SELECT_JOINED} ORDER BY r.created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Set the processing status and the amount collected.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was updated.
    pub async fn update_status(
        &self,
        id: RegistrationId,
        status: RegistrationStatus,
        fee_paid: Option<Fee>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE registrations
            SET status = $2, fee_paid = COALESCE($3, fee_paid), updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(status.to_string())
        .bind(fee_paid.map(|f| f.amount()))
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
    pub async fn delete(&self, id: RegistrationId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
