//! Dashboard route handler.

use askama::Template;
use axum::{Router, extract::State, response::Html, routing::get};
use tower_sessions::Session;
use tracing::instrument;

use esep_core::{RegistrationStatus, WatchedTable};

use super::registrations::RegistrationView;
use super::{Layout, render};
use crate::db::{DashboardStats, RegistrationRepository};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Number of registrations shown in the "recent" panel.
const RECENT_LIMIT: i64 = 5;

/// Per-status count for the summary cards.
#[derive(Debug, Clone)]
pub struct StatusCount {
    pub status: String,
    pub label: &'static str,
    pub count: i64,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub stats: DashboardStats,
    pub status_counts: Vec<StatusCount>,
    pub recent: Vec<RegistrationView>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// Dashboard page handler.
///
/// GET /
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Html<String> {
    let stats = DashboardStats::load(state.pool())
        .await
        .inspect_err(|e| tracing::error!("Failed to load dashboard stats: {e}"))
        .unwrap_or_default();

    let recent = RegistrationRepository::new(state.pool())
        .recent(RECENT_LIMIT)
        .await
        .inspect_err(|e| tracing::error!("Failed to load recent registrations: {e}"))
        .unwrap_or_default();

    let status_counts = RegistrationStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status: status.to_string(),
            label: status.label(),
            count: stats.registrations_with(status),
        })
        .collect();

    let template = DashboardTemplate {
        layout: Layout::new(&session, Some(&admin), "/")
            .await
            .live(WatchedTable::Registrations),
        stats,
        status_counts,
        recent: recent.iter().map(RegistrationView::from).collect(),
    };
    render(&template)
}
