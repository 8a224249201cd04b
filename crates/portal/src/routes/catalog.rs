//! Public category catalog.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use chrono::Utc;
use tracing::instrument;

use crate::config::ContactInfo;
use crate::filters;
use crate::models::{CatalogCategory, PublicAnnouncement};
use crate::state::AppState;

/// A category card as rendered in the catalog grid.
#[derive(Debug, Clone)]
pub struct CategoryCard {
    pub id: String,
    pub name: String,
    pub actual_fee: String,
    pub offer_fee: String,
    pub savings: String,
    pub discount_percent: i64,
    pub is_free: bool,
    pub is_featured: bool,
    pub style: &'static str,
    pub image_url: Option<String>,
}

impl CategoryCard {
    #[must_use]
    pub fn new(category: &CatalogCategory, index: usize) -> Self {
        let pricing = category.pricing;
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            actual_fee: pricing.actual.to_string(),
            offer_fee: pricing.offer.to_string(),
            savings: pricing.savings_display(),
            discount_percent: pricing.discount_percent(),
            is_free: pricing.is_free(),
            is_featured: category.is_highlighted,
            style: category.card_style(index),
            image_url: category.popup_image_url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnnouncementView {
    pub title: String,
    pub content: String,
    pub expiry_date: Option<String>,
}

impl From<&PublicAnnouncement> for AnnouncementView {
    fn from(a: &PublicAnnouncement) -> Self {
        Self {
            title: a.title.clone(),
            content: a.content.clone(),
            expiry_date: a.expiry_date.map(|d| d.format("%d %b %Y").to_string()),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate {
    pub categories: Vec<CategoryCard>,
    pub announcements: Vec<AnnouncementView>,
    /// The category query failed; shown instead of the empty state.
    pub load_failed: bool,
    pub contact: ContactInfo,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/categories", get(index))
}

/// GET / and GET /categories
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> CatalogTemplate {
    let (categories, load_failed) = match state.cache().categories(state.pool()).await {
        Ok(list) => (
            list.iter()
                .enumerate()
                .map(|(i, c)| CategoryCard::new(c, i))
                .collect(),
            false,
        ),
        Err(e) => {
            tracing::error!("Failed to load categories: {e}");
            (Vec::new(), true)
        }
    };

    let announcements = state
        .cache()
        .announcements(state.pool(), Utc::now().date_naive())
        .await
        .map(|list| list.iter().map(AnnouncementView::from).collect())
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to load announcements: {e}");
            Vec::new()
        });

    CatalogTemplate {
        categories,
        announcements,
        load_failed,
        contact: state.config().contact.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use esep_core::{CategoryId, Fee, Pricing};

    use super::*;

    fn category(name: &str, actual: &str, offer: &str, highlighted: bool) -> CatalogCategory {
        CatalogCategory {
            id: CategoryId::new(uuid::Uuid::new_v4()),
            name: name.to_string(),
            pricing: Pricing::new(Fee::parse(actual).unwrap(), Fee::parse(offer).unwrap()),
            popup_image_url: None,
            is_highlighted: highlighted,
        }
    }

    #[test]
    fn test_card_shows_savings_and_discount() {
        let card = CategoryCard::new(&category("Trade License", "500", "250", false), 0);
        assert_eq!(card.actual_fee, "500");
        assert_eq!(card.offer_fee, "250");
        assert_eq!(card.savings, "250");
        assert_eq!(card.discount_percent, 50);
        assert!(!card.is_free);
        assert_eq!(card.style, "card-blue");
    }

    #[test]
    fn test_free_featured_card() {
        let card = CategoryCard::new(&category("Kudumbashree", "100", "0", true), 2);
        assert!(card.is_free);
        assert!(card.is_featured);
        assert_eq!(card.discount_percent, 100);
        assert_eq!(card.style, "card-featured");
    }

    #[test]
    fn test_catalog_renders_cards_and_empty_state() {
        let page = CatalogTemplate {
            categories: vec![CategoryCard::new(&category("Trade License", "500", "250", false), 0)],
            announcements: vec![AnnouncementView {
                title: "Camp at Kadakkal".to_string(),
                content: "Registration camp on Saturday.".to_string(),
                expiry_date: None,
            }],
            load_failed: false,
            contact: ContactInfo::default(),
        };
        let html = page.render().unwrap();
        assert!(html.contains("Trade License"));
        assert!(html.contains("You Save: ₹250"));
        assert!(html.contains("50% OFF"));
        assert!(html.contains("Camp at Kadakkal"));
        assert!(html.contains("support@esep.gov.in"));

        let empty = CatalogTemplate {
            categories: Vec::new(),
            announcements: Vec::new(),
            load_failed: false,
            contact: ContactInfo::default(),
        };
        assert!(empty
            .render()
            .unwrap()
            .contains("No categories available at the moment."));
    }

    #[test]
    fn test_catalog_load_error_message() {
        let page = CatalogTemplate {
            categories: Vec::new(),
            announcements: Vec::new(),
            load_failed: true,
            contact: ContactInfo::default(),
        };
        assert!(page
            .render()
            .unwrap()
            .contains("Error loading categories. Please try again later."));
    }

    #[test]
    fn test_zero_discount_cards_still_show_savings() {
        let page = CatalogTemplate {
            categories: vec![
                CategoryCard::new(&category("Ration Card", "0", "0", false), 0),
                CategoryCard::new(&category("Building Permit", "500", "500", false), 1),
            ],
            announcements: Vec::new(),
            load_failed: false,
            contact: ContactInfo::default(),
        };
        let html = page.render().unwrap();
        assert_eq!(html.matches("You Save: ₹0").count(), 2);
        assert_eq!(html.matches("Discount: 0% OFF").count(), 2);
    }

    #[test]
    fn test_offer_above_actual_shows_negative_discount() {
        let card = CategoryCard::new(&category("Late Filing", "200", "300", false), 0);
        assert_eq!(card.discount_percent, -50);
        assert_eq!(card.savings, "-100");

        let page = CatalogTemplate {
            categories: vec![card],
            announcements: Vec::new(),
            load_failed: false,
            contact: ContactInfo::default(),
        };
        let html = page.render().unwrap();
        assert!(html.contains("You Save: ₹-100"));
        assert!(html.contains("Discount: -50% OFF"));
    }
}

