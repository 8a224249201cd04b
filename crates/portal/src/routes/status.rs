//! Registration status lookup.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use tracing::instrument;

use crate::db::{RegistrationRepository, RepositoryError};
use crate::error::AppError;
use crate::models::{RegistrationStatusView, StatusQuery};
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "status.html")]
pub struct StatusTemplate {
    pub customer_id: String,
    pub phone: String,
    /// A lookup was submitted (so "not found" is worth saying).
    pub searched: bool,
    pub result: Option<RegistrationStatusView>,
}

impl StatusTemplate {
    /// CSS modifier for the status badge.
    #[must_use]
    pub fn badge_class(&self) -> &'static str {
        self.result
            .as_ref()
            .map_or("", |r| match r.status {
                esep_core::RegistrationStatus::Pending => "badge-pending",
                esep_core::RegistrationStatus::Approved => "badge-approved",
                esep_core::RegistrationStatus::Rejected => "badge-rejected",
                esep_core::RegistrationStatus::Completed => "badge-completed",
            })
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/status", get(lookup))
}

/// GET /status?customer_id=&phone=
#[instrument(skip(state, query))]
pub async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<StatusTemplate, AppError> {
    let result = match query.lookup_key() {
        Some((customer_id, phone)) => {
            match RegistrationRepository::new(state.pool())
                .find_status(&customer_id, &phone)
                .await
            {
                Ok(found) => Some(found),
                Err(RepositoryError::NotFound) => None,
                Err(e) => return Err(e.into()),
            }
        }
        None => None,
    };

    tracing::debug!(found = result.is_some(), "Status lookup");

    let searched = query.is_submitted();
    Ok(StatusTemplate {
        customer_id: query.customer_id.unwrap_or_default(),
        phone: query.phone.unwrap_or_default(),
        searched,
        result,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use esep_core::RegistrationStatus;

    use super::*;

    #[test]
    fn test_not_found_message_only_after_search() {
        let fresh = StatusTemplate {
            customer_id: String::new(),
            phone: String::new(),
            searched: false,
            result: None,
        };
        assert!(!fresh.render().unwrap().contains("No registration found"));

        let missed = StatusTemplate {
            searched: true,
            customer_id: "ESEP-00000000".to_string(),
            ..fresh
        };
        assert!(missed.render().unwrap().contains("No registration found"));
    }

    #[test]
    fn test_found_registration() {
        let page = StatusTemplate {
            customer_id: "ESEP-1A2B3C4D".to_string(),
            phone: "9876543210".to_string(),
            searched: true,
            result: Some(RegistrationStatusView {
                customer_id: "ESEP-1A2B3C4D".to_string(),
                full_name: "Anitha K".to_string(),
                status: RegistrationStatus::Approved,
                category_name: "Trade License".to_string(),
                panchayath_name: "Kadakkal".to_string(),
            }),
        };
        assert_eq!(page.badge_class(), "badge-approved");
        let html = page.render().unwrap();
        assert!(html.contains("Approved"));
        assert!(html.contains("Kadakkal"));
    }
}
