//! Catalog cards, panchayath choices and announcements.

use chrono::NaiveDate;

use esep_core::{AnnouncementId, CategoryId, PanchayathId, Pricing};

/// Card styles applied in rotation by position in the catalog.
pub const CARD_STYLES: [&str; 7] = [
    "card-blue",
    "card-green",
    "card-purple",
    "card-orange",
    "card-teal",
    "card-rose",
    "card-indigo",
];

/// An active category as offered to the public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCategory {
    pub id: CategoryId,
    pub name: String,
    pub pricing: Pricing,
    pub popup_image_url: Option<String>,
    pub is_highlighted: bool,
}

impl CatalogCategory {
    /// Style class for the card at `index`; highlighted cards always get gold.
    #[must_use]
    pub fn card_style(&self, index: usize) -> &'static str {
        if self.is_highlighted {
            return "card-featured";
        }
        CARD_STYLES
            .get(index % CARD_STYLES.len())
            .copied()
            .unwrap_or("card-blue")
    }
}

/// A panchayath in the registration form's `<select>`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PanchayathOption {
    pub id: PanchayathId,
    pub name: String,
    pub district: String,
}

impl PanchayathOption {
    /// "Name (District)", or just the name when no district is recorded.
    #[must_use]
    pub fn label(&self) -> String {
        if self.district.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.district)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PublicAnnouncement {
    pub id: AnnouncementId,
    pub title: String,
    pub content: String,
    pub expiry_date: Option<NaiveDate>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use esep_core::Fee;

    use super::*;

    fn category(highlighted: bool) -> CatalogCategory {
        CatalogCategory {
            id: CategoryId::new(uuid::Uuid::new_v4()),
            name: "Trade License".to_string(),
            pricing: Pricing::new(Fee::parse("500").unwrap(), Fee::parse("250").unwrap()),
            popup_image_url: None,
            is_highlighted: highlighted,
        }
    }

    #[test]
    fn test_card_styles_rotate() {
        let c = category(false);
        assert_eq!(c.card_style(0), "card-blue");
        assert_eq!(c.card_style(6), "card-indigo");
        assert_eq!(c.card_style(7), "card-blue");
    }

    #[test]
    fn test_highlighted_card_is_featured() {
        assert_eq!(category(true).card_style(3), "card-featured");
    }

    #[test]
    fn test_panchayath_label() {
        let mut p = PanchayathOption {
            id: PanchayathId::new(uuid::Uuid::new_v4()),
            name: "Kadakkal".to_string(),
            district: "Kollam".to_string(),
        };
        assert_eq!(p.label(), "Kadakkal (Kollam)");
        p.district.clear();
        assert_eq!(p.label(), "Kadakkal");
    }
}
