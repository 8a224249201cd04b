//! Domain types for the public portal.

pub mod catalog;
pub mod registration;

pub use catalog::{CatalogCategory, PanchayathOption, PublicAnnouncement};
pub use registration::{
    NewRegistration, RegistrationForm, RegistrationStatusView, StatusQuery, generate_customer_id,
};

use thiserror::Error;

/// Why a submitted form was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields.")]
    MissingRequired,

    #[error("{field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl ValidationError {
    pub(crate) fn invalid(field: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            field,
            message: message.to_string(),
        }
    }
}

/// Trimmed optional text field; blank becomes `None`.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
