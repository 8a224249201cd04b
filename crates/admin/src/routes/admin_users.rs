//! Admin account management (super admins only).

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_sessions::Session;
use tracing::instrument;

use esep_core::{AdminRole, AdminUserId};

use super::{Layout, SelectOption, redirect_with, render};
use crate::db::AdminUserRepository;
use crate::middleware::RequireSuperAdmin;
use crate::models::{AdminUser, AdminUserForm, Notice};
use crate::services::{AdminAuthError, AdminAuthService};
use crate::state::AppState;

const LIST_PATH: &str = "/admin-users";

/// Admin account row for templates.
#[derive(Debug, Clone)]
pub struct AdminUserListItem {
    pub id: String,
    pub username: String,
    pub role_label: &'static str,
    pub is_active: bool,
    pub is_self: bool,
    pub last_login: Option<String>,
    pub created_at: String,
}

impl AdminUserListItem {
    fn new(user: &AdminUser, current: AdminUserId) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            role_label: user.role.label(),
            is_active: user.is_active,
            is_self: user.id == current,
            last_login: user
                .last_login
                .map(|t| t.format("%d %b %Y %H:%M").to_string()),
            created_at: user.created_at.format("%d %b %Y").to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin_users/index.html")]
pub struct AdminUsersTemplate {
    pub layout: Layout,
    pub users: Vec<AdminUserListItem>,
    pub username: String,
    pub roles: Vec<SelectOption>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIST_PATH, get(index).post(create))
        .route("/admin-users/{id}/toggle", post(toggle_active))
}

fn role_options(selected: Option<AdminRole>) -> Vec<SelectOption> {
    AdminRole::ALL
        .iter()
        .map(|role| SelectOption {
            value: role.to_string(),
            label: role.label().to_string(),
            selected: selected == Some(*role),
        })
        .collect()
}

async fn render_page(
    state: &AppState,
    layout: Layout,
    current: AdminUserId,
    username: String,
    role: Option<AdminRole>,
) -> Response {
    let users = match AdminUserRepository::new(state.pool()).list_all().await {
        Ok(users) => users
            .iter()
            .map(|u| AdminUserListItem::new(u, current))
            .collect(),
        Err(e) => {
            tracing::error!("Failed to load admin users: {e}");
            Vec::new()
        }
    };

    let template = AdminUsersTemplate {
        layout,
        users,
        username,
        roles: role_options(role.or(Some(AdminRole::UserAdmin))),
    };
    render(&template).into_response()
}

/// Admin users page handler.
///
/// GET /admin-users
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Response {
    let layout = Layout::new(&session, Some(&admin), LIST_PATH).await;
    render_page(&state, layout, admin.id, String::new(), None).await
}

/// Create an admin account.
///
/// POST /admin-users
#[instrument(skip(admin, state, session, form))]
pub async fn create(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AdminUserForm>,
) -> Response {
    let role = form.role.parse::<AdminRole>().ok();

    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(e) => {
            let layout = Layout::new(&session, Some(&admin), LIST_PATH)
                .await
                .with_notice(Notice::validation(&e));
            return render_page(&state, layout, admin.id, form.username, role).await;
        }
    };

    match AdminAuthService::new(state.pool()).create_admin(&draft).await {
        Ok(id) => {
            tracing::info!(admin_id = %id, role = %draft.role, created_by = %admin.id, "Admin user created");
            redirect_with(&session, Notice::saved("Admin user", true), LIST_PATH)
                .await
                .into_response()
        }
        Err(e) => {
            let notice = if matches!(e, AdminAuthError::UserAlreadyExists) {
                Notice::error(
                    "Username taken",
                    format!("An admin named \"{}\" already exists.", draft.username),
                )
            } else {
                tracing::error!("Failed to create admin user: {e}");
                Notice::save_failed("admin user")
            };
            let layout = Layout::new(&session, Some(&admin), LIST_PATH)
                .await
                .with_notice(notice);
            render_page(&state, layout, admin.id, form.username, role).await
        }
    }
}

/// Activate or deactivate an account. Super admins cannot deactivate themselves.
///
/// POST /admin-users/{id}/toggle
#[instrument(skip(admin, state, session))]
pub async fn toggle_active(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<AdminUserId>,
) -> Redirect {
    if id == admin.id {
        return redirect_with(
            &session,
            Notice::error("Not allowed", "You cannot deactivate your own account."),
            LIST_PATH,
        )
        .await;
    }

    let repo = AdminUserRepository::new(state.pool());
    let target = match repo.list_all().await {
        Ok(users) => users.into_iter().find(|u| u.id == id),
        Err(e) => {
            tracing::error!("Failed to load admin users: {e}");
            None
        }
    };
    let Some(target) = target else {
        return redirect_with(&session, Notice::save_failed("admin user"), LIST_PATH).await;
    };

    let notice = match repo.set_active(id, !target.is_active).await {
        Ok(()) => {
            tracing::info!(admin_id = %id, is_active = !target.is_active, "Admin user toggled");
            let verb = if target.is_active { "deactivated" } else { "activated" };
            Notice::success("Success", format!("{} has been {verb}.", target.username))
        }
        Err(e) => {
            tracing::error!("Failed to update admin user: {e}");
            Notice::save_failed("admin user")
        }
    };

    redirect_with(&session, notice, LIST_PATH).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_options_default_selection() {
        let options = role_options(Some(AdminRole::UserAdmin));
        assert_eq!(options.len(), 3);
        let mut selected = options.iter().filter(|o| o.selected);
        assert_eq!(selected.next().map(|o| o.value.as_str()), Some("user_admin"));
        assert!(selected.next().is_none());
    }
}
