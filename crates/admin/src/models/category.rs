//! Category domain type and form.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use esep_core::{CategoryId, Fee, Pricing};

use super::{ValidationError, non_blank, optional_text};

/// A registration category (domain type).
#[derive(Debug, Clone)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub pricing: Pricing,
    pub popup_image_url: Option<String>,
    pub is_active: bool,
    pub is_highlighted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw create/edit form input.
///
/// Checkboxes are absent from the body when unchecked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub actual_fee: String,
    #[serde(default)]
    pub offer_fee: String,
    #[serde(default)]
    pub popup_image_url: Option<String>,
    #[serde(default)]
    pub is_active: Option<String>,
    #[serde(default)]
    pub is_highlighted: Option<String>,
}

/// Validated category fields ready for insert or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub pricing: Pricing,
    pub popup_image_url: Option<String>,
    pub is_active: bool,
    pub is_highlighted: bool,
}

impl CategoryForm {
    /// Pre-fill the edit form from a stored category.
    #[must_use]
    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            actual_fee: category.pricing.actual.to_string(),
            offer_fee: category.pricing.offer.to_string(),
            popup_image_url: category.popup_image_url.clone(),
            is_active: category.is_active.then(|| "on".to_string()),
            is_highlighted: category.is_highlighted.then(|| "on".to_string()),
        }
    }

    /// Check required fields, then coerce the fees to numbers.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequired` when the name or either fee is blank, and
    /// `Invalid` when a fee is not a non-negative number.
    pub fn validate(&self) -> Result<CategoryDraft, ValidationError> {
        let (Some(name), Some(actual), Some(offer)) = (
            non_blank(&self.name),
            non_blank(&self.actual_fee),
            non_blank(&self.offer_fee),
        ) else {
            return Err(ValidationError::MissingRequired);
        };

        let actual = Fee::parse(actual).map_err(|e| ValidationError::invalid("Actual fee", e))?;
        let offer = Fee::parse(offer).map_err(|e| ValidationError::invalid("Offer fee", e))?;

        Ok(CategoryDraft {
            name: name.to_string(),
            pricing: Pricing::new(actual, offer),
            popup_image_url: optional_text(self.popup_image_url.as_deref()),
            is_active: self.is_active.is_some(),
            is_highlighted: self.is_highlighted.is_some(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, actual: &str, offer: &str) -> CategoryForm {
        CategoryForm {
            name: name.to_string(),
            actual_fee: actual.to_string(),
            offer_fee: offer.to_string(),
            is_active: Some("on".to_string()),
            ..CategoryForm::default()
        }
    }

    #[test]
    fn test_valid_form() {
        let draft = form("Trade License", "500", "250").validate().unwrap();
        assert_eq!(draft.name, "Trade License");
        assert_eq!(draft.pricing.discount_percent(), 50);
        assert!(draft.is_active);
        assert!(!draft.is_highlighted);
        assert_eq!(draft.popup_image_url, None);
    }

    #[test]
    fn test_blank_fields_are_missing() {
        assert_eq!(
            form("", "500", "250").validate(),
            Err(ValidationError::MissingRequired)
        );
        assert_eq!(
            form("Trade License", "  ", "250").validate(),
            Err(ValidationError::MissingRequired)
        );
        assert_eq!(
            form("Trade License", "500", "").validate(),
            Err(ValidationError::MissingRequired)
        );
    }

    #[test]
    fn test_non_numeric_fee_rejected() {
        let err = form("Trade License", "five hundred", "250")
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Invalid {
                field: "Actual fee",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_offer_rejected() {
        let err = form("Trade License", "500", "-1").validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Invalid {
                field: "Offer fee",
                ..
            }
        ));
    }

    #[test]
    fn test_offer_above_actual_is_accepted() {
        let draft = form("Catering", "100", "150").validate().unwrap();
        assert_eq!(draft.pricing.discount_percent(), -50);
    }

    #[test]
    fn test_unchecked_active_box_deactivates() {
        let mut input = form("Tailoring", "300", "200");
        input.is_active = None;
        input.popup_image_url = Some("  https://cdn.example.org/t.png ".to_string());
        let draft = input.validate().unwrap();
        assert!(!draft.is_active);
        assert_eq!(
            draft.popup_image_url.as_deref(),
            Some("https://cdn.example.org/t.png")
        );
    }
}
