//! Announcement domain type and form.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use esep_core::AnnouncementId;

use super::{ValidationError, non_blank, optional_text};

/// A notice shown on the public portal until it expires or is deactivated.
#[derive(Debug, Clone)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub title: String,
    pub content: String,
    pub expiry_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Announcement {
    /// True once the expiry date has passed (the expiry day itself still shows).
    #[must_use]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|date| date < today)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnouncementForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub is_active: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementDraft {
    pub title: String,
    pub content: String,
    pub expiry_date: Option<NaiveDate>,
    pub is_active: bool,
}

impl AnnouncementForm {
    #[must_use]
    pub fn from_announcement(announcement: &Announcement) -> Self {
        Self {
            title: announcement.title.clone(),
            content: announcement.content.clone(),
            expiry_date: announcement
                .expiry_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
            is_active: announcement.is_active.then(|| "on".to_string()),
        }
    }

    /// # Errors
    ///
    /// Returns `MissingRequired` for a blank title or content, and `Invalid`
    /// when the expiry date is not `YYYY-MM-DD`.
    pub fn validate(&self) -> Result<AnnouncementDraft, ValidationError> {
        let (Some(title), Some(content)) = (non_blank(&self.title), non_blank(&self.content))
        else {
            return Err(ValidationError::MissingRequired);
        };

        let expiry_date = optional_text(self.expiry_date.as_deref())
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map_err(|_| ValidationError::invalid("Expiry date", "use YYYY-MM-DD"))
            })
            .transpose()?;

        Ok(AnnouncementDraft {
            title: title.to_string(),
            content: content.to_string(),
            expiry_date,
            is_active: self.is_active.is_some(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(expiry: Option<&str>) -> AnnouncementForm {
        AnnouncementForm {
            title: "Camp".to_string(),
            content: "Registration camp at the panchayath office".to_string(),
            expiry_date: expiry.map(str::to_string),
            is_active: Some("on".to_string()),
        }
    }

    #[test]
    fn test_expiry_optional() {
        assert_eq!(form(None).validate().unwrap().expiry_date, None);
        assert_eq!(form(Some("")).validate().unwrap().expiry_date, None);
    }

    #[test]
    fn test_expiry_parsed() {
        let draft = form(Some("2026-12-31")).validate().unwrap();
        assert_eq!(draft.expiry_date, NaiveDate::from_ymd_opt(2026, 12, 31));
    }

    #[test]
    fn test_bad_expiry_rejected() {
        assert!(matches!(
            form(Some("31/12/2026")).validate(),
            Err(ValidationError::Invalid { field: "Expiry date", .. })
        ));
    }

    #[test]
    fn test_title_and_content_required() {
        let mut input = form(None);
        input.content = " ".to_string();
        assert_eq!(input.validate(), Err(ValidationError::MissingRequired));
    }

    #[test]
    fn test_is_expired() {
        let draft = form(Some("2026-01-10")).validate().unwrap();
        let announcement = Announcement {
            id: AnnouncementId::new(uuid::Uuid::nil()),
            title: draft.title,
            content: draft.content,
            expiry_date: draft.expiry_date,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
        assert!(!announcement.is_expired(day(10)));
        assert!(announcement.is_expired(day(11)));
    }
}
