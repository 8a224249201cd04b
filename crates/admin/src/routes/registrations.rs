//! Registration review route handlers.
//!
//! Registrations are created on the portal; admins filter them, move them
//! through the status workflow and record the fee collected.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use esep_core::{RegistrationId, RegistrationStatus, WatchedTable};

use super::{Layout, SelectOption, redirect_with, render};
use crate::db::{PanchayathRepository, RegistrationFilter, RegistrationRepository};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::{Notice, Registration, RegistrationStatusForm};
use crate::state::AppState;

const LIST_PATH: &str = "/registrations";

/// Registration row for templates.
#[derive(Debug, Clone)]
pub struct RegistrationView {
    pub id: String,
    pub customer_id: String,
    pub full_name: String,
    pub phone: String,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub ward: Option<String>,
    pub agent_pro: Option<String>,
    pub category_name: String,
    pub panchayath_name: String,
    pub status: String,
    pub status_label: &'static str,
    pub fee_paid: Option<String>,
    pub created_at: String,
}

impl From<&Registration> for RegistrationView {
    fn from(r: &Registration) -> Self {
        Self {
            id: r.id.to_string(),
            customer_id: r.customer_id.clone(),
            full_name: r.full_name.clone(),
            phone: r.phone.clone(),
            mobile_number: r.mobile_number.clone(),
            email: r.email.clone(),
            address: r.address.clone(),
            ward: r.ward.clone(),
            agent_pro: r.agent_pro.clone(),
            category_name: r.category_name.clone(),
            panchayath_name: r.panchayath_name.clone(),
            status: r.status.to_string(),
            status_label: r.status.label(),
            fee_paid: r.fee_paid.map(|f| f.to_string()),
            created_at: r.created_at.format("%d %b %Y %H:%M").to_string(),
        }
    }
}

/// Raw filter query. Blank or unparseable values mean "any".
#[derive(Debug, Default, Deserialize)]
pub struct RegistrationQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub panchayath: Option<String>,
}

impl RegistrationQuery {
    fn filter(&self) -> RegistrationFilter {
        fn parse<T: std::str::FromStr>(raw: Option<&String>) -> Option<T> {
            raw.map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .and_then(|s| s.parse().ok())
        }

        RegistrationFilter {
            status: parse(self.status.as_ref()),
            category_id: parse(self.category.as_ref()),
            panchayath_id: parse(self.panchayath.as_ref()),
        }
    }
}

#[derive(Template)]
#[template(path = "registrations/index.html")]
pub struct RegistrationsTemplate {
    pub layout: Layout,
    pub registrations: Vec<RegistrationView>,
    pub statuses: Vec<SelectOption>,
    pub categories: Vec<SelectOption>,
    pub panchayaths: Vec<SelectOption>,
    pub filtered: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIST_PATH, get(index))
        .route("/registrations/{id}/status", post(update_status))
        .route("/registrations/{id}/delete", post(delete))
}

/// Registrations list with filters.
///
/// GET /registrations?status=&category=&panchayath=
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<RegistrationQuery>,
) -> Response {
    let filter = query.filter();

    let registrations = match RegistrationRepository::new(state.pool()).list(filter).await {
        Ok(rows) => rows.iter().map(RegistrationView::from).collect(),
        Err(e) => {
            tracing::error!("Failed to load registrations: {e}");
            Vec::new()
        }
    };

    let categories = match state.categories().categories(state.pool()).await {
        Ok(categories) => categories
            .iter()
            .map(|c| SelectOption {
                value: c.id.to_string(),
                label: c.name.clone(),
                selected: filter.category_id == Some(c.id),
            })
            .collect(),
        Err(e) => {
            tracing::error!("Failed to load categories: {e}");
            Vec::new()
        }
    };

    let panchayaths = match PanchayathRepository::new(state.pool()).list_all().await {
        Ok(rows) => rows
            .iter()
            .map(|p| SelectOption {
                value: p.id.to_string(),
                label: p.name.clone(),
                selected: filter.panchayath_id == Some(p.id),
            })
            .collect(),
        Err(e) => {
            tracing::error!("Failed to load panchayaths: {e}");
            Vec::new()
        }
    };

    let template = RegistrationsTemplate {
        layout: Layout::new(&session, Some(&admin), LIST_PATH)
            .await
            .live(WatchedTable::Registrations),
        registrations,
        statuses: status_options(filter.status),
        categories,
        panchayaths,
        filtered: filter != RegistrationFilter::default(),
    };
    render(&template).into_response()
}

fn status_options(selected: Option<RegistrationStatus>) -> Vec<SelectOption> {
    RegistrationStatus::ALL
        .iter()
        .map(|status| SelectOption {
            value: status.to_string(),
            label: status.label().to_string(),
            selected: selected == Some(*status),
        })
        .collect()
}

/// Update status and fee paid.
///
/// POST /registrations/{id}/status
#[instrument(skip(admin, state, session, form))]
pub async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<RegistrationId>,
    Form(form): Form<RegistrationStatusForm>,
) -> Redirect {
    if !admin.permissions().can_write {
        return redirect_with(
            &session,
            Notice::permission_denied("modify registrations"),
            LIST_PATH,
        )
        .await;
    }

    let (status, fee_paid) = match form.validate() {
        Ok(parsed) => parsed,
        Err(e) => return redirect_with(&session, Notice::validation(&e), LIST_PATH).await,
    };

    let notice = match RegistrationRepository::new(state.pool())
        .update_status(id, status, fee_paid)
        .await
    {
        Ok(()) => {
            tracing::info!(registration_id = %id, %status, "Registration status updated");
            Notice::saved("Registration", false)
        }
        Err(e) => {
            tracing::error!(registration_id = %id, "Failed to update registration: {e}");
            Notice::save_failed("registration")
        }
    };

    redirect_with(&session, notice, LIST_PATH).await
}

/// POST /registrations/{id}/delete
#[instrument(skip(admin, state, session))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<RegistrationId>,
) -> Redirect {
    if !admin.permissions().can_delete {
        return redirect_with(
            &session,
            Notice::permission_denied("delete registrations"),
            LIST_PATH,
        )
        .await;
    }

    let notice = match RegistrationRepository::new(state.pool()).delete(id).await {
        Ok(()) => {
            tracing::info!(registration_id = %id, "Registration deleted");
            Notice::deleted("Registration")
        }
        Err(e) => {
            tracing::warn!(registration_id = %id, "Failed to delete registration: {e}");
            Notice::delete_failed("registration", None)
        }
    };

    redirect_with(&session, notice, LIST_PATH).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use esep_core::{CategoryId, PanchayathId};

    #[test]
    fn test_blank_query_means_any() {
        let query = RegistrationQuery {
            status: Some(String::new()),
            category: Some("  ".to_string()),
            panchayath: None,
        };
        assert_eq!(query.filter(), RegistrationFilter::default());
    }

    #[test]
    fn test_query_parses_values() {
        let category = CategoryId::new(uuid::Uuid::new_v4());
        let query = RegistrationQuery {
            status: Some("approved".to_string()),
            category: Some(category.to_string()),
            panchayath: Some("not-a-uuid".to_string()),
        };
        let filter = query.filter();
        assert_eq!(filter.status, Some(RegistrationStatus::Approved));
        assert_eq!(filter.category_id, Some(category));
        assert_eq!(filter.panchayath_id, None::<PanchayathId>);
    }

    #[test]
    fn test_status_options_mark_selection() {
        let options = status_options(Some(RegistrationStatus::Rejected));
        assert_eq!(options.len(), 4);
        assert!(options.iter().filter(|o| o.selected).all(|o| o.value == "rejected"));
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
    }
}
