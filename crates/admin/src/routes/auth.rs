//! Authentication route handlers for admin.
//!
//! Username and password login; the session ID is cycled on success.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::post,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{Layout, render};
use crate::middleware::{
    OptionalAdminAuth, clear_current_admin, login_rate_limiter, push_notice, set_current_admin,
};
use crate::models::{CurrentAdmin, Notice};
use crate::services::{AdminAuthError, AdminAuthService};
use crate::state::AppState;

/// Login form input.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    layout: Layout,
    username: String,
}

/// Build the auth router. Only credential checks are rate limited.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/auth/login",
            post(login).layer(login_rate_limiter()).get(login_page),
        )
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
#[instrument(skip_all)]
async fn login_page(OptionalAdminAuth(admin): OptionalAdminAuth, session: Session) -> Response {
    if admin.is_some() {
        return Redirect::to("/").into_response();
    }

    let template = LoginPageTemplate {
        layout: Layout::new(&session, None, "/auth/login").await,
        username: String::new(),
    };
    render(&template).into_response()
}

/// Check credentials and start a session.
///
/// POST /auth/login
#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let service = AdminAuthService::new(state.pool());

    let user = match service.login(&form.username, &form.password).await {
        Ok(user) => user,
        Err(e) => {
            if matches!(e, AdminAuthError::InvalidCredentials) {
                tracing::info!(username = %form.username.trim(), "Admin login rejected");
            } else {
                tracing::error!(error = %e, "Admin login failed");
            }
            let template = LoginPageTemplate {
                layout: Layout::new(&session, None, "/auth/login")
                    .await
                    .with_notice(Notice::login_failed()),
                username: form.username.trim().to_string(),
            };
            return render(&template).into_response();
        }
    };

    let admin = CurrentAdmin::new(user.id, user.username.clone(), user.role);
    if let Err(e) = set_current_admin(&session, &admin).await {
        tracing::error!(error = %e, "Failed to store admin session");
        let template = LoginPageTemplate {
            layout: Layout::new(&session, None, "/auth/login")
                .await
                .with_notice(Notice::login_failed()),
            username: user.username,
        };
        return render(&template).into_response();
    }

    tracing::info!(admin_id = %admin.id, role = %admin.role, "Admin logged in");
    push_notice(&session, Notice::login_succeeded(&admin.username)).await;
    Redirect::to("/").into_response()
}

/// Logout and clear session.
///
/// POST /auth/logout
#[instrument(skip_all)]
async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::warn!(error = %e, "Failed to clear admin session");
    }
    Redirect::to("/auth/login")
}
