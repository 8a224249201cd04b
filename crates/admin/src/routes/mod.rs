//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                         - Liveness check
//! GET  /health/ready                   - Readiness check (database)
//!
//! # Auth
//! GET  /auth/login                     - Login page
//! POST /auth/login                     - Check credentials (rate limited)
//! POST /auth/logout                    - Logout
//!
//! # Dashboard
//! GET  /                               - Counts and newest registrations
//! GET  /events                         - Server-sent change events
//!
//! # Categories
//! GET  /categories                     - List + create form
//! POST /categories                     - Create
//! GET  /categories/{id}/edit           - Edit form
//! POST /categories/{id}                - Update
//! GET  /categories/{id}/delete         - Delete confirmation
//! POST /categories/{id}/delete         - Delete
//!
//! # Panchayaths, Announcements         - Same shape as categories
//!
//! # Registrations
//! GET  /registrations                  - Filtered list
//! POST /registrations/{id}/status      - Update status / fee paid
//! POST /registrations/{id}/delete      - Delete
//!
//! # Admin Users (super admin only)
//! GET  /admin-users                    - List + create form
//! POST /admin-users                    - Create
//! POST /admin-users/{id}/toggle        - Activate / deactivate
//! ```

pub mod admin_users;
pub mod announcements;
pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod events;
pub mod panchayaths;
pub mod registrations;

use askama::Template;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn,
    response::{Html, Redirect},
    routing::get,
};
use tower_http::services::ServeDir;
use tower_sessions::{Session, SessionStore};

use esep_core::{AdminRole, WatchedTable};

use crate::db;
use crate::middleware::{
    create_session_layer, postgres_store, push_notice, request_id_middleware,
    security_headers_middleware, take_notice,
};
use crate::models::{CurrentAdmin, Notice};
use crate::state::AppState;

/// Signed-in admin as seen by templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub username: String,
    pub role_label: &'static str,
    pub is_super_admin: bool,
    pub can_write: bool,
    pub can_delete: bool,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        let permissions = admin.permissions();
        Self {
            username: admin.username.clone(),
            role_label: admin.role.label(),
            is_super_admin: admin.role == AdminRole::SuperAdmin,
            can_write: permissions.can_write,
            can_delete: permissions.can_delete,
        }
    }
}

/// A `<select>` option.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Data every page passes to `base.html`.
#[derive(Debug, Clone)]
pub struct Layout {
    pub admin_user: Option<AdminUserView>,
    pub notice: Option<Notice>,
    pub current_path: &'static str,
    /// Table whose changes trigger a reload via `live.js`; empty for none.
    pub live_table: &'static str,
}

impl Layout {
    /// Build the layout, consuming any pending notice from the session.
    pub async fn new(
        session: &Session,
        admin: Option<&CurrentAdmin>,
        current_path: &'static str,
    ) -> Self {
        Self {
            admin_user: admin.map(AdminUserView::from),
            notice: take_notice(session).await,
            current_path,
            live_table: "",
        }
    }

    /// Reload the page when `table` changes.
    #[must_use]
    pub const fn live(mut self, table: WatchedTable) -> Self {
        self.live_table = table.as_str();
        self
    }

    /// Show `notice` now instead of the one queued in the session.
    #[must_use]
    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }

    #[must_use]
    pub fn can_write(&self) -> bool {
        self.admin_user.as_ref().is_some_and(|a| a.can_write)
    }

    #[must_use]
    pub fn can_delete(&self) -> bool {
        self.admin_user.as_ref().is_some_and(|a| a.can_delete)
    }
}

/// Render a template, logging failures.
pub fn render<T: Template>(template: &T) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// Queue `notice` and redirect to `to`.
pub async fn redirect_with(session: &Session, notice: Notice, to: &str) -> Redirect {
    push_notice(session, notice).await;
    Redirect::to(to)
}

/// Build the admin router with sessions, security headers and request IDs.
///
/// Tracing and Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let store = postgres_store(state.pool());
    app_with_store(state, store)
}

/// [`app`] with sessions kept in `store`.
pub fn app_with_store<S>(state: AppState, store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = create_session_layer(store, state.config());
    let static_dir = ServeDir::new(&state.config().static_dir);

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", static_dir)
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application routes (without health checks or static files).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(events::router())
        .merge(categories::router())
        .merge(panchayaths::router())
        .merge(announcements::router())
        .merge(registrations::router())
        .merge(admin_users::router())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match db::ping(state.pool()).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
