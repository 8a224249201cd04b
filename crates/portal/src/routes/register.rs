//! Public registration form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::instrument;

use esep_core::CategoryId;

use crate::db::{CatalogRepository, PanchayathRepository, RegistrationRepository, RepositoryError};
use crate::error::AppError;
use crate::filters;
use crate::middleware::registration_rate_limiter;
use crate::models::{CatalogCategory, PanchayathOption, RegistrationForm, ValidationError};
use crate::state::AppState;

/// The category being registered for, as shown above the form.
#[derive(Debug, Clone)]
pub struct SelectedCategory {
    pub id: String,
    pub name: String,
    pub actual_fee: String,
    pub offer_fee: String,
    pub discount_percent: i64,
    pub is_free: bool,
}

impl From<&CatalogCategory> for SelectedCategory {
    fn from(c: &CatalogCategory) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            actual_fee: c.pricing.actual.to_string(),
            offer_fee: c.pricing.offer.to_string(),
            discount_percent: c.pricing.discount_percent(),
            is_free: c.pricing.is_free(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PanchayathChoice {
    pub id: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub category: SelectedCategory,
    pub panchayaths: Vec<PanchayathChoice>,
    pub form: RegistrationForm,
    pub error: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "register_done.html")]
pub struct RegisterDoneTemplate {
    pub customer_id: String,
    pub category_name: String,
    pub fee: String,
    pub is_free: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/register/{category_id}",
        post(submit).layer(registration_rate_limiter()).get(show),
    )
}

fn panchayath_choices(list: &[PanchayathOption], selected: &str) -> Vec<PanchayathChoice> {
    list.iter()
        .map(|p| {
            let id = p.id.to_string();
            PanchayathChoice {
                selected: id == selected.trim(),
                label: p.label(),
                id,
            }
        })
        .collect()
}

async fn active_category(state: &AppState, raw_id: &str) -> Result<CatalogCategory, AppError> {
    let id = raw_id
        .parse::<CategoryId>()
        .map_err(|_| AppError::NotFound("category".to_string()))?;

    CatalogRepository::new(state.pool())
        .get_active(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("category".to_string()),
            other => AppError::Database(other),
        })
}

async fn form_page(
    state: &AppState,
    category: &CatalogCategory,
    form: RegistrationForm,
    error: Option<String>,
) -> RegisterTemplate {
    let panchayaths = match state.cache().panchayaths(state.pool()).await {
        Ok(list) => panchayath_choices(&list, &form.panchayath_id),
        Err(e) => {
            tracing::error!("Failed to load panchayaths: {e}");
            Vec::new()
        }
    };

    RegisterTemplate {
        category: SelectedCategory::from(category),
        panchayaths,
        form,
        error,
    }
}

/// GET /register/{category_id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<RegisterTemplate, AppError> {
    let category = active_category(&state, &category_id).await?;
    Ok(form_page(&state, &category, RegistrationForm::default(), None).await)
}

/// POST /register/{category_id}
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    Form(form): Form<RegistrationForm>,
) -> Result<Response, AppError> {
    let category = active_category(&state, &category_id).await?;

    let registration = match form.validate(category.id, category.pricing.offer) {
        Ok(registration) => registration,
        Err(e) => return Ok(rejected(&state, &category, form, &e).await),
    };

    let panchayath_ok = PanchayathRepository::new(state.pool())
        .is_active(registration.panchayath_id)
        .await?;
    if !panchayath_ok {
        let e = ValidationError::invalid("Panchayath", "choose a panchayath from the list");
        return Ok(rejected(&state, &category, form, &e).await);
    }

    match RegistrationRepository::new(state.pool())
        .create(&registration)
        .await
    {
        Ok(customer_id) => Ok(RegisterDoneTemplate {
            customer_id,
            category_name: category.name.clone(),
            fee: category.pricing.offer.to_string(),
            is_free: category.pricing.is_free(),
        }
        .into_response()),
        Err(RepositoryError::MissingReference(constraint)) => {
            tracing::warn!(constraint = %constraint, "Registration referenced a removed row");
            let e = ValidationError::invalid("Panchayath", "choose a panchayath from the list");
            Ok(rejected(&state, &category, form, &e).await)
        }
        Err(e) => Err(e.into()),
    }
}

async fn rejected(
    state: &AppState,
    category: &CatalogCategory,
    form: RegistrationForm,
    error: &ValidationError,
) -> Response {
    let page = form_page(state, category, form, Some(error.to_string())).await;
    (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use esep_core::{Fee, PanchayathId, Pricing};

    use super::*;

    fn category() -> CatalogCategory {
        CatalogCategory {
            id: CategoryId::new(uuid::Uuid::new_v4()),
            name: "Trade License".to_string(),
            pricing: Pricing::new(Fee::parse("500").unwrap(), Fee::parse("250").unwrap()),
            popup_image_url: None,
            is_highlighted: false,
        }
    }

    fn panchayaths() -> Vec<PanchayathOption> {
        vec![
            PanchayathOption {
                id: PanchayathId::new(uuid::Uuid::new_v4()),
                name: "Kadakkal".to_string(),
                district: "Kollam".to_string(),
            },
            PanchayathOption {
                id: PanchayathId::new(uuid::Uuid::new_v4()),
                name: "Chithara".to_string(),
                district: "Kollam".to_string(),
            },
        ]
    }

    #[test]
    fn test_choices_keep_selection() {
        let list = panchayaths();
        let chosen = list.get(1).unwrap().id.to_string();
        let choices = panchayath_choices(&list, &chosen);
        let selected: Vec<_> = choices.iter().filter(|c| c.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected.first().unwrap().label, "Chithara (Kollam)");
    }

    #[test]
    fn test_form_renders_error_and_values() {
        let page = RegisterTemplate {
            category: SelectedCategory::from(&category()),
            panchayaths: panchayath_choices(&panchayaths(), ""),
            form: RegistrationForm {
                full_name: "Anitha K".to_string(),
                ..RegistrationForm::default()
            },
            error: Some(ValidationError::MissingRequired.to_string()),
        };
        let html = page.render().unwrap();
        assert!(html.contains("Please fill in all required fields."));
        assert!(html.contains("value=\"Anitha K\""));
        assert!(html.contains("Kadakkal (Kollam)"));
        assert!(html.contains("Trade License"));
    }

    #[test]
    fn test_done_page_shows_customer_id() {
        let page = RegisterDoneTemplate {
            customer_id: "ESEP-1A2B3C4D".to_string(),
            category_name: "Trade License".to_string(),
            fee: "250".to_string(),
            is_free: false,
        };
        let html = page.render().unwrap();
        assert!(html.contains("ESEP-1A2B3C4D"));
        assert!(html.contains("₹250"));
    }
}
