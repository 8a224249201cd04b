//! Panchayath domain type and form.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use esep_core::PanchayathId;

use super::{ValidationError, non_blank, optional_text};

/// A local administrative region that registrations are filed under.
#[derive(Debug, Clone)]
pub struct Panchayath {
    pub id: PanchayathId,
    pub name: String,
    pub district: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PanchayathForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub is_active: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanchayathDraft {
    pub name: String,
    pub district: String,
    pub is_active: bool,
}

impl PanchayathForm {
    #[must_use]
    pub fn from_panchayath(panchayath: &Panchayath) -> Self {
        Self {
            name: panchayath.name.clone(),
            district: Some(panchayath.district.clone()),
            is_active: panchayath.is_active.then(|| "on".to_string()),
        }
    }

    /// Only the name is required; district defaults to empty.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequired` when the name is blank.
    pub fn validate(&self) -> Result<PanchayathDraft, ValidationError> {
        let name = non_blank(&self.name).ok_or(ValidationError::MissingRequired)?;
        Ok(PanchayathDraft {
            name: name.to_string(),
            district: optional_text(self.district.as_deref()).unwrap_or_default(),
            is_active: self.is_active.is_some(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_name_required() {
        let form = PanchayathForm::default();
        assert_eq!(form.validate(), Err(ValidationError::MissingRequired));
    }

    #[test]
    fn test_district_defaults_to_empty() {
        let form = PanchayathForm {
            name: " Chavara ".to_string(),
            district: None,
            is_active: Some("on".to_string()),
        };
        let draft = form.validate().unwrap();
        assert_eq!(draft.name, "Chavara");
        assert_eq!(draft.district, "");
        assert!(draft.is_active);
    }
}
