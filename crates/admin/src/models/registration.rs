//! Registration domain type and the status update form.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use esep_core::{CategoryId, Fee, PanchayathId, RegistrationId, RegistrationStatus};

use super::{ValidationError, optional_text};

/// A citizen registration joined with its category and panchayath names.
#[derive(Debug, Clone)]
pub struct Registration {
    pub id: RegistrationId,
    pub customer_id: String,
    pub full_name: String,
    pub phone: String,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub ward: Option<String>,
    pub agent_pro: Option<String>,
    pub category_id: CategoryId,
    pub category_name: String,
    pub panchayath_id: PanchayathId,
    pub panchayath_name: String,
    pub status: RegistrationStatus,
    pub fee_paid: Option<Fee>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Status change submitted from the registrations table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationStatusForm {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub fee_paid: Option<String>,
}

impl RegistrationStatusForm {
    /// # Errors
    ///
    /// Returns `Invalid` for an unknown status or a malformed fee.
    pub fn validate(&self) -> Result<(RegistrationStatus, Option<Fee>), ValidationError> {
        let status = self
            .status
            .trim()
            .parse::<RegistrationStatus>()
            .map_err(|e| ValidationError::invalid("Status", e))?;
        let fee_paid = optional_text(self.fee_paid.as_deref())
            .map(|raw| Fee::parse(&raw).map_err(|e| ValidationError::invalid("Fee paid", e)))
            .transpose()?;
        Ok((status, fee_paid))
    }
}
