//! One-shot notices shown on the next rendered page.
//!
//! Handlers push a [`Notice`] into the session before redirecting; the base
//! template renders it once and it is removed on read.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Visual weight of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A titled message for the admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    /// CSS modifier class for the notice banner.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.level {
            NoticeLevel::Success => "notice-success",
            NoticeLevel::Error => "notice-error",
        }
    }

    /// `action` completes "You don't have permission to ...".
    #[must_use]
    pub fn permission_denied(action: &str) -> Self {
        Self::error(
            "Permission Denied",
            format!("You don't have permission to {action}."),
        )
    }

    #[must_use]
    pub fn validation(err: &ValidationError) -> Self {
        Self::error("Validation Error", err.to_string())
    }

    /// "Category Created" / "Category Updated" style confirmation.
    #[must_use]
    pub fn saved(entity: &str, created: bool) -> Self {
        let (verb, past) = if created {
            ("Created", "created")
        } else {
            ("Updated", "updated")
        };
        Self::success(
            format!("{entity} {verb}"),
            format!("{entity} has been {past} successfully."),
        )
    }

    #[must_use]
    pub fn deleted(entity: &str) -> Self {
        Self::success(
            format!("{entity} Deleted"),
            format!("{entity} has been deleted successfully."),
        )
    }

    /// Generic save failure; `noun` is lower-case ("category").
    #[must_use]
    pub fn save_failed(noun: &str) -> Self {
        Self::error(
            "Operation Failed",
            format!("Failed to save {noun}. Please try again."),
        )
    }

    /// Generic delete failure; `in_use_hint` names what may still reference the row.
    #[must_use]
    pub fn delete_failed(noun: &str, in_use_hint: Option<&str>) -> Self {
        let message = match in_use_hint {
            Some(hint) => format!("Failed to delete {noun}. It may be in use by {hint}."),
            None => format!("Failed to delete {noun}. Please try again."),
        };
        Self::error("Delete Failed", message)
    }

    #[must_use]
    pub fn login_failed() -> Self {
        Self::error(
            "Login Failed",
            "Invalid username or password. Please try again.",
        )
    }

    #[must_use]
    pub fn login_succeeded(username: &str) -> Self {
        Self::success("Login Successful", format!("Welcome back, {username}!"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_notices_match_contract() {
        let denied = Notice::permission_denied("modify categories");
        assert_eq!(denied.title, "Permission Denied");
        assert_eq!(
            denied.message,
            "You don't have permission to modify categories."
        );

        let failed = Notice::save_failed("category");
        assert_eq!(failed.title, "Operation Failed");
        assert_eq!(failed.message, "Failed to save category. Please try again.");

        let delete = Notice::delete_failed("category", Some("registrations"));
        assert_eq!(delete.title, "Delete Failed");
        assert_eq!(
            delete.message,
            "Failed to delete category. It may be in use by registrations."
        );
    }

    #[test]
    fn test_saved_title_reflects_mode() {
        assert_eq!(Notice::saved("Category", true).title, "Category Created");
        assert_eq!(Notice::saved("Category", false).title, "Category Updated");
        assert_eq!(Notice::saved("Category", false).level, NoticeLevel::Success);
    }

    #[test]
    fn test_validation_notice() {
        let notice = Notice::validation(&ValidationError::MissingRequired);
        assert_eq!(notice.title, "Validation Error");
        assert_eq!(notice.message, "Please fill in all required fields.");
        assert_eq!(notice.css_class(), "notice-error");
    }

    #[test]
    fn test_login_notices() {
        assert_eq!(
            Notice::login_failed().message,
            "Invalid username or password. Please try again."
        );
        assert_eq!(
            Notice::login_succeeded("admin").message,
            "Welcome back, admin!"
        );
    }
}
