//! Domain models and form types for the admin panel.
//!
//! Forms arrive as raw strings from `application/x-www-form-urlencoded`
//! bodies; each form's `validate()` turns them into a typed draft that the
//! repositories accept.

pub mod admin_user;
pub mod announcement;
pub mod category;
pub mod notice;
pub mod panchayath;
pub mod registration;
pub mod session;

use thiserror::Error;

pub use admin_user::{AdminUser, AdminUserDraft, AdminUserForm};
pub use announcement::{Announcement, AnnouncementDraft, AnnouncementForm};
pub use category::{Category, CategoryDraft, CategoryForm};
pub use notice::{Notice, NoticeLevel};
pub use panchayath::{Panchayath, PanchayathDraft, PanchayathForm};
pub use registration::{Registration, RegistrationStatusForm};
pub use session::CurrentAdmin;

/// Form validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// At least one required field is blank.
    #[error("Please fill in all required fields.")]
    MissingRequired,

    /// A field is present but unusable.
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

/// Trimmed value of a required text field, or `None` if blank.
pub(crate) fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Trimmed optional text field; blank becomes `None`.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value.and_then(non_blank).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  Kollam "), Some("Kollam"));
        assert_eq!(non_blank("   "), None);
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(Some(" x ")), Some("x".to_string()));
        assert_eq!(optional_text(Some("")), None);
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn test_invalid_display() {
        let err = ValidationError::invalid("Actual fee", "fee must be a number");
        assert_eq!(err.to_string(), "Actual fee: fee must be a number");
    }
}
