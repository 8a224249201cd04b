//! Announcement management route handlers.
//!
//! Expired announcements stay listed here (flagged) so they can be edited
//! or removed; only the portal hides them.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::Utc;
use tower_sessions::Session;
use tracing::instrument;

use esep_core::{AnnouncementId, WatchedTable};

use super::{Layout, redirect_with, render};
use crate::db::{AnnouncementRepository, RepositoryError};
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::{Announcement, AnnouncementForm, CurrentAdmin, Notice};
use crate::state::AppState;

const LIST_PATH: &str = "/announcements";

#[derive(Debug, Clone)]
pub struct AnnouncementView {
    pub id: String,
    pub title: String,
    pub content: String,
    pub expiry_date: Option<String>,
    pub is_active: bool,
    pub is_expired: bool,
    pub created_at: String,
}

impl AnnouncementView {
    fn new(announcement: &Announcement, today: chrono::NaiveDate) -> Self {
        Self {
            id: announcement.id.to_string(),
            title: announcement.title.clone(),
            content: announcement.content.clone(),
            expiry_date: announcement
                .expiry_date
                .map(|d| d.format("%d %b %Y").to_string()),
            is_active: announcement.is_active,
            is_expired: announcement.is_expired(today),
            created_at: announcement.created_at.format("%d %b %Y").to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "announcements/index.html")]
pub struct AnnouncementsTemplate {
    pub layout: Layout,
    pub announcements: Vec<AnnouncementView>,
    pub form: AnnouncementForm,
    pub editing: Option<String>,
    pub form_action: String,
}

#[derive(Template)]
#[template(path = "announcements/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub layout: Layout,
    pub announcement: AnnouncementView,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIST_PATH, get(index).post(create))
        .route("/announcements/{id}", post(update))
        .route("/announcements/{id}/edit", get(edit))
        .route(
            "/announcements/{id}/delete",
            get(confirm_delete).post(delete),
        )
}

async fn render_page(
    state: &AppState,
    layout: Layout,
    form: AnnouncementForm,
    editing: Option<AnnouncementId>,
) -> Response {
    let today = Utc::now().date_naive();
    let announcements = match AnnouncementRepository::new(state.pool()).list_all().await {
        Ok(rows) => rows.iter().map(|a| AnnouncementView::new(a, today)).collect(),
        Err(e) => {
            tracing::error!("Failed to load announcements: {e}");
            Vec::new()
        }
    };

    let template = AnnouncementsTemplate {
        layout: layout.live(WatchedTable::Announcements),
        announcements,
        form,
        editing: editing.map(|id| id.to_string()),
        form_action: editing
            .map_or_else(|| LIST_PATH.to_string(), |id| format!("/announcements/{id}")),
    };
    render(&template).into_response()
}

/// GET /announcements
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Response {
    let layout = Layout::new(&session, Some(&admin), LIST_PATH).await;
    let form = AnnouncementForm {
        is_active: Some("on".to_string()),
        ..AnnouncementForm::default()
    };
    render_page(&state, layout, form, None).await
}

/// GET /announcements/{id}/edit
#[instrument(skip(admin, state, session))]
pub async fn edit(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<AnnouncementId>,
) -> Response {
    if !admin.permissions().can_write {
        return deny(&session, "modify announcements").await.into_response();
    }

    match AnnouncementRepository::new(state.pool()).get_by_id(id).await {
        Ok(announcement) => {
            let layout = Layout::new(&session, Some(&admin), LIST_PATH).await;
            let form = AnnouncementForm::from_announcement(&announcement);
            render_page(&state, layout, form, Some(id)).await
        }
        Err(RepositoryError::NotFound) => Redirect::to(LIST_PATH).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// POST /announcements
#[instrument(skip(admin, state, session, form))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AnnouncementForm>,
) -> Response {
    save(&admin, &state, &session, None, form).await
}

/// POST /announcements/{id}
#[instrument(skip(admin, state, session, form))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<AnnouncementId>,
    Form(form): Form<AnnouncementForm>,
) -> Response {
    save(&admin, &state, &session, Some(id), form).await
}

async fn save(
    admin: &CurrentAdmin,
    state: &AppState,
    session: &Session,
    id: Option<AnnouncementId>,
    form: AnnouncementForm,
) -> Response {
    if !admin.permissions().can_write {
        return deny(session, "modify announcements").await.into_response();
    }

    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(e) => {
            let layout = Layout::new(session, Some(admin), LIST_PATH)
                .await
                .with_notice(Notice::validation(&e));
            return render_page(state, layout, form, id).await;
        }
    };

    let repo = AnnouncementRepository::new(state.pool());
    let result = match id {
        Some(id) => repo.update(id, &draft).await.map(|()| id),
        None => repo.create(&draft).await,
    };

    match result {
        Ok(saved_id) => {
            tracing::info!(announcement_id = %saved_id, "Announcement saved");
            redirect_with(session, Notice::saved("Announcement", id.is_none()), LIST_PATH)
                .await
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to save announcement: {e}");
            let layout = Layout::new(session, Some(admin), LIST_PATH)
                .await
                .with_notice(Notice::save_failed("announcement"));
            render_page(state, layout, form, id).await
        }
    }
}

/// GET /announcements/{id}/delete
#[instrument(skip(admin, state, session))]
pub async fn confirm_delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<AnnouncementId>,
) -> Response {
    if !admin.permissions().can_delete {
        return deny(&session, "delete announcements").await.into_response();
    }

    match AnnouncementRepository::new(state.pool()).get_by_id(id).await {
        Ok(announcement) => {
            let template = ConfirmDeleteTemplate {
                layout: Layout::new(&session, Some(&admin), LIST_PATH).await,
                announcement: AnnouncementView::new(&announcement, Utc::now().date_naive()),
            };
            render(&template).into_response()
        }
        Err(RepositoryError::NotFound) => Redirect::to(LIST_PATH).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// POST /announcements/{id}/delete
#[instrument(skip(admin, state, session))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<AnnouncementId>,
) -> Redirect {
    if !admin.permissions().can_delete {
        return deny(&session, "delete announcements").await;
    }

    let notice = match AnnouncementRepository::new(state.pool()).delete(id).await {
        Ok(()) => {
            tracing::info!(announcement_id = %id, "Announcement deleted");
            Notice::deleted("Announcement")
        }
        Err(e) => {
            tracing::warn!(announcement_id = %id, "Failed to delete announcement: {e}");
            Notice::delete_failed("announcement", None)
        }
    };

    redirect_with(&session, notice, LIST_PATH).await
}

async fn deny(session: &Session, action: &str) -> Redirect {
    redirect_with(session, Notice::permission_denied(action), LIST_PATH).await
}
