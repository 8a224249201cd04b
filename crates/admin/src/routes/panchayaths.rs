//! Panchayath management route handlers.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_sessions::Session;
use tracing::instrument;

use esep_core::{PanchayathId, WatchedTable};

use super::{Layout, redirect_with, render};
use crate::db::{PanchayathRepository, RepositoryError};
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::{CurrentAdmin, Notice, Panchayath, PanchayathForm};
use crate::state::AppState;

const LIST_PATH: &str = "/panchayaths";

#[derive(Debug, Clone)]
pub struct PanchayathView {
    pub id: String,
    pub name: String,
    pub district: String,
    pub is_active: bool,
}

impl From<&Panchayath> for PanchayathView {
    fn from(p: &Panchayath) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            district: p.district.clone(),
            is_active: p.is_active,
        }
    }
}

#[derive(Template)]
#[template(path = "panchayaths/index.html")]
pub struct PanchayathsTemplate {
    pub layout: Layout,
    pub panchayaths: Vec<PanchayathView>,
    pub form: PanchayathForm,
    pub editing: Option<String>,
    pub form_action: String,
}

#[derive(Template)]
#[template(path = "panchayaths/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub layout: Layout,
    pub panchayath: PanchayathView,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIST_PATH, get(index).post(create))
        .route("/panchayaths/{id}", post(update))
        .route("/panchayaths/{id}/edit", get(edit))
        .route("/panchayaths/{id}/delete", get(confirm_delete).post(delete))
}

async fn render_page(
    state: &AppState,
    layout: Layout,
    form: PanchayathForm,
    editing: Option<PanchayathId>,
) -> Response {
    let panchayaths = match PanchayathRepository::new(state.pool()).list_all().await {
        Ok(rows) => rows.iter().map(PanchayathView::from).collect(),
        Err(e) => {
            tracing::error!("Failed to load panchayaths: {e}");
            Vec::new()
        }
    };

    let template = PanchayathsTemplate {
        layout: layout.live(WatchedTable::Panchayaths),
        panchayaths,
        form,
        editing: editing.map(|id| id.to_string()),
        form_action: editing
            .map_or_else(|| LIST_PATH.to_string(), |id| format!("/panchayaths/{id}")),
    };
    render(&template).into_response()
}

/// GET /panchayaths
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Response {
    let layout = Layout::new(&session, Some(&admin), LIST_PATH).await;
    let form = PanchayathForm {
        is_active: Some("on".to_string()),
        ..PanchayathForm::default()
    };
    render_page(&state, layout, form, None).await
}

/// GET /panchayaths/{id}/edit
#[instrument(skip(admin, state, session))]
pub async fn edit(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<PanchayathId>,
) -> Response {
    if !admin.permissions().can_write {
        return deny(&session, "modify panchayaths").await.into_response();
    }

    match PanchayathRepository::new(state.pool()).get_by_id(id).await {
        Ok(panchayath) => {
            let layout = Layout::new(&session, Some(&admin), LIST_PATH).await;
            let form = PanchayathForm::from_panchayath(&panchayath);
            render_page(&state, layout, form, Some(id)).await
        }
        Err(RepositoryError::NotFound) => Redirect::to(LIST_PATH).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// POST /panchayaths
#[instrument(skip(admin, state, session, form))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PanchayathForm>,
) -> Response {
    save(&admin, &state, &session, None, form).await
}

/// POST /panchayaths/{id}
#[instrument(skip(admin, state, session, form))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<PanchayathId>,
    Form(form): Form<PanchayathForm>,
) -> Response {
    save(&admin, &state, &session, Some(id), form).await
}

async fn save(
    admin: &CurrentAdmin,
    state: &AppState,
    session: &Session,
    id: Option<PanchayathId>,
    form: PanchayathForm,
) -> Response {
    if !admin.permissions().can_write {
        return deny(session, "modify panchayaths").await.into_response();
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

    let repo = PanchayathRepository::new(state.pool());
    let result = match id {
        Some(id) => repo.update(id, &draft).await.map(|()| id),
        None => repo.create(&draft).await,
    };

    match result {
        Ok(saved_id) => {
            tracing::info!(panchayath_id = %saved_id, "Panchayath saved");
            redirect_with(session, Notice::saved("Panchayath", id.is_none()), LIST_PATH)
                .await
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to save panchayath: {e}");
            let layout = Layout::new(session, Some(admin), LIST_PATH)
                .await
                .with_notice(Notice::save_failed("panchayath"));
            render_page(state, layout, form, id).await
        }
    }
}

/// GET /panchayaths/{id}/delete
#[instrument(skip(admin, state, session))]
pub async fn confirm_delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<PanchayathId>,
) -> Response {
    if !admin.permissions().can_delete {
        return deny(&session, "delete panchayaths").await.into_response();
    }

    match PanchayathRepository::new(state.pool()).get_by_id(id).await {
        Ok(panchayath) => {
            let template = ConfirmDeleteTemplate {
                layout: Layout::new(&session, Some(&admin), LIST_PATH).await,
                panchayath: PanchayathView::from(&panchayath),
            };
            render(&template).into_response()
        }
        Err(RepositoryError::NotFound) => Redirect::to(LIST_PATH).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// POST /panchayaths/{id}/delete
#[instrument(skip(admin, state, session))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<PanchayathId>,
) -> Redirect {
    if !admin.permissions().can_delete {
        return deny(&session, "delete panchayaths").await;
    }

    let notice = match PanchayathRepository::new(state.pool()).delete(id).await {
        Ok(()) => {
            tracing::info!(panchayath_id = %id, "Panchayath deleted");
            Notice::deleted("Panchayath")
        }
        Err(e) => {
            tracing::warn!(panchayath_id = %id, "Failed to delete panchayath: {e}");
            Notice::delete_failed("panchayath", Some("registrations"))
        }
    };

    redirect_with(&session, notice, LIST_PATH).await
}

async fn deny(session: &Session, action: &str) -> Redirect {
    redirect_with(session, Notice::permission_denied(action), LIST_PATH).await
}
