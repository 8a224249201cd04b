//! Aggregate counts for the dashboard overview.

use sqlx::PgPool;

use esep_core::RegistrationStatus;

use super::RepositoryError;

/// Headline numbers shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct DashboardStats {
    pub categories_total: i64,
    pub categories_active: i64,
    pub registrations_total: i64,
    pub registrations_pending: i64,
    pub registrations_approved: i64,
    pub registrations_rejected: i64,
    pub registrations_completed: i64,
    pub panchayaths_active: i64,
    pub announcements_active: i64,
}

impl DashboardStats {
    /// Load all counts in a single round trip.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn load(pool: &PgPool) -> Result<Self, RepositoryError> {
        let stats = sqlx::query_as::<_, Self>(
            r"
            SELECT
                (SELECT COUNT(*) FROM categories) AS categories_total,
                (SELECT COUNT(*) FROM categories WHERE is_active) AS categories_active,
                (SELECT COUNT(*) FROM registrations) AS registrations_total,
                (SELECT COUNT(*) FROM registrations WHERE status = 'pending') AS registrations_pending,
                (SELECT COUNT(*) FROM registrations WHERE status = 'approved') AS registrations_approved,
                (SELECT COUNT(*) FROM registrations WHERE status = 'rejected') AS registrations_rejected,
                (SELECT COUNT(*) FROM registrations WHERE status = 'completed') AS registrations_completed,
                (SELECT COUNT(*) FROM panchayaths WHERE is_active) AS panchayaths_active,
                (SELECT COUNT(*) FROM announcements
                    WHERE is_active AND (expiry_date IS NULL OR expiry_date >= CURRENT_DATE)
                ) AS announcements_active
            ",
        )
        .fetch_one(pool)
        .await?;

        Ok(stats)
    }

    /// Count for a single status.
    #[must_use]
    pub const fn registrations_with(&self, status: RegistrationStatus) -> i64 {
        match status {
            RegistrationStatus::Pending => self.registrations_pending,
            RegistrationStatus::Approved => self.registrations_approved,
            RegistrationStatus::Rejected => self.registrations_rejected,
            RegistrationStatus::Completed => self.registrations_completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registrations_with() {
        let stats = DashboardStats {
            registrations_pending: 4,
            registrations_completed: 2,
            ..DashboardStats::default()
        };
        assert_eq!(stats.registrations_with(RegistrationStatus::Pending), 4);
        assert_eq!(stats.registrations_with(RegistrationStatus::Completed), 2);
        assert_eq!(stats.registrations_with(RegistrationStatus::Rejected), 0);
    }
}
