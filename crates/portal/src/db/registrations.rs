//! Registration inserts and public status lookups.

use sqlx::PgPool;

use esep_core::{PhoneNumber, RegistrationId, RegistrationStatus};

use super::RepositoryError;
use crate::models::{NewRegistration, RegistrationStatusView, generate_customer_id};

/// Attempts at drawing an unused customer id before giving up.
const CUSTOMER_ID_ATTEMPTS: usize = 5;

const CUSTOMER_ID_CONSTRAINT: &str = "registrations_customer_id_key";

#[derive(Debug, sqlx::FromRow)]
struct StatusRow {
    customer_id: String,
    full_name: String,
    status: String,
    category_name: String,
    panchayath_name: String,
}

impl TryFrom<StatusRow> for RegistrationStatusView {
    type Error = RepositoryError;

    fn try_from(row: StatusRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<RegistrationStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "registration {} has status {:?}: {e}",
                row.customer_id, row.status
            ))
        })?;

        Ok(Self {
            customer_id: row.customer_id,
            full_name: row.full_name,
            status,
            category_name: row.category_name,
            panchayath_name: row.panchayath_name,
        })
    }
}

pub struct RegistrationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RegistrationRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a pending registration and return its customer id.
    ///
    /// A colliding customer id is redrawn a few times before the conflict
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingReference` if the category or
    /// panchayath no longer exists, or `RepositoryError::Database` on failure.
    pub async fn create(&self, registration: &NewRegistration) -> Result<String, RepositoryError> {
        let mut last_conflict = None;

        for _ in 0..CUSTOMER_ID_ATTEMPTS {
            let customer_id = generate_customer_id();
            match self.insert(&customer_id, registration).await {
                Ok(id) => {
                    tracing::info!(registration_id = %id, customer_id = %customer_id, "Registration created");
                    return Ok(customer_id);
                }
                Err(RepositoryError::Conflict(constraint)) if constraint == CUSTOMER_ID_CONSTRAINT => {
                    tracing::warn!(customer_id = %customer_id, "Customer id collision, retrying");
                    last_conflict = Some(constraint);
                }
                Err(e) => return Err(e),
            }
        }

        Err(RepositoryError::Conflict(
            last_conflict.unwrap_or_else(|| CUSTOMER_ID_CONSTRAINT.to_string()),
        ))
    }

    async fn insert(
        &self,
        customer_id: &str,
        r: &NewRegistration,
    ) -> Result<RegistrationId, RepositoryError> {
        let id = sqlx::query_scalar::<_, RegistrationId>(
            r"
            INSERT INTO registrations
                (customer_id, full_name, name, phone, mobile_number, email, address,
                 ward, agent_pro, category_id, panchayath_id, status, fee_paid)
            VALUES ($1, $2, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            ",
        )
        .bind(customer_id)
        .bind(&r.full_name)
        .bind(r.phone.as_str())
        .bind(r.mobile_number.as_ref().map(PhoneNumber::as_str))
        .bind(r.email.as_deref())
        .bind(&r.address)
        .bind(r.ward.as_deref())
        .bind(r.agent_pro.as_deref())
        .bind(r.category_id)
        .bind(r.panchayath_id)
        .bind(RegistrationStatus::Pending.to_string())
        .bind(r.fee_paid.amount())
        .fetch_one(self.pool)
        .await?;
        Ok(id)
    }

    /// Look up a registration by customer id and phone number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` unless both values match one row.
    pub async fn find_status(
        &self,
        customer_id: &str,
        phone: &PhoneNumber,
    ) -> Result<RegistrationStatusView, RepositoryError> {
        let row = sqlx::query_as::<_, StatusRow>(
            r"
            SELECT r.customer_id, r.full_name, r.status,
                   c.name AS category_name, p.name AS panchayath_name
            FROM registrations r
            JOIN categories c ON c.id = r.category_id
            JOIN panchayaths p ON p.id = r.panchayath_id
            WHERE r.customer_id = $1 AND r.phone = $2
            ",
        )
        .bind(customer_id)
        .bind(phone.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }
}
