//! Category management route handlers.
//!
//! Writes require `can_write`, deletes require `can_delete`; a request
//! without the permission changes nothing and leaves a notice instead.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_sessions::Session;
use tracing::instrument;

use esep_core::{CategoryId, WatchedTable};

use super::{Layout, redirect_with, render};
use crate::db::{CategoryRepository, RepositoryError};
use crate::filters;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::{Category, CategoryForm, CurrentAdmin, Notice};
use crate::state::AppState;

const LIST_PATH: &str = "/categories";

/// Category row for templates.
#[derive(Debug, Clone)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    pub actual_fee: String,
    pub offer_fee: String,
    pub discount_percent: i64,
    pub is_active: bool,
    pub is_highlighted: bool,
    pub popup_image_url: Option<String>,
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            actual_fee: category.pricing.actual.to_string(),
            offer_fee: category.pricing.offer.to_string(),
            discount_percent: category.pricing.discount_percent(),
            is_active: category.is_active,
            is_highlighted: category.is_highlighted,
            popup_image_url: category.popup_image_url.clone(),
        }
    }
}

/// Categories list page with the create or edit form.
#[derive(Template)]
#[template(path = "categories/index.html")]
pub struct CategoriesTemplate {
    pub layout: Layout,
    pub categories: Vec<CategoryView>,
    pub form: CategoryForm,
    /// `Some(id)` while editing an existing category.
    pub editing: Option<String>,
    pub form_action: String,
}

/// Delete confirmation page.
#[derive(Template)]
#[template(path = "categories/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub layout: Layout,
    pub category: CategoryView,
}

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIST_PATH, get(index).post(create))
        .route("/categories/{id}", post(update))
        .route("/categories/{id}/edit", get(edit))
        .route("/categories/{id}/delete", get(confirm_delete).post(delete))
}

fn new_form() -> CategoryForm {
    CategoryForm {
        is_active: Some("on".to_string()),
        ..CategoryForm::default()
    }
}

/// Render the list page around `form`, reading categories through the cache.
async fn render_page(
    state: &AppState,
    layout: Layout,
    form: CategoryForm,
    editing: Option<CategoryId>,
) -> Response {
    let categories = match state.categories().categories(state.pool()).await {
        Ok(categories) => categories.iter().map(CategoryView::from).collect(),
        Err(e) => {
            tracing::error!("Failed to load categories: {e}");
            Vec::new()
        }
    };

    let template = CategoriesTemplate {
        layout: layout.live(WatchedTable::Categories),
        categories,
        form,
        editing: editing.map(|id| id.to_string()),
        form_action: editing.map_or_else(|| LIST_PATH.to_string(), |id| format!("/categories/{id}")),
    };
    render(&template).into_response()
}

/// Categories list page handler.
///
/// GET /categories
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Response {
    let layout = Layout::new(&session, Some(&admin), LIST_PATH).await;
    render_page(&state, layout, new_form(), None).await
}

/// Edit form handler.
///
/// GET /categories/{id}/edit
#[instrument(skip(admin, state, session))]
pub async fn edit(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<CategoryId>,
) -> Response {
    if !admin.permissions().can_write {
        return deny_write(&session).await.into_response();
    }

    match CategoryRepository::new(state.pool()).get_by_id(id).await {
        Ok(category) => {
            let layout = Layout::new(&session, Some(&admin), LIST_PATH).await;
            render_page(&state, layout, CategoryForm::from_category(&category), Some(id)).await
        }
        Err(RepositoryError::NotFound) => Redirect::to(LIST_PATH).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Create category handler.
///
/// POST /categories
#[instrument(skip(admin, state, session, form))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CategoryForm>,
) -> Response {
    save(&admin, &state, &session, None, form).await
}

/// Update category handler.
///
/// POST /categories/{id}
#[instrument(skip(admin, state, session, form))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<CategoryId>,
    Form(form): Form<CategoryForm>,
) -> Response {
    save(&admin, &state, &session, Some(id), form).await
}

async fn save(
    admin: &CurrentAdmin,
    state: &AppState,
    session: &Session,
    id: Option<CategoryId>,
    form: CategoryForm,
) -> Response {
    if !admin.permissions().can_write {
        return deny_write(session).await.into_response();
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

    let repo = CategoryRepository::new(state.pool());
    let result = match id {
        Some(id) => repo.update(id, &draft).await.map(|()| id),
        None => repo.create(&draft).await,
    };

    match result {
        Ok(saved_id) => {
            state.categories().invalidate_categories().await;
            tracing::info!(category_id = %saved_id, created = id.is_none(), "Category saved");
            redirect_with(session, Notice::saved("Category", id.is_none()), LIST_PATH)
                .await
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to save category: {e}");
            let layout = Layout::new(session, Some(admin), LIST_PATH)
                .await
                .with_notice(Notice::save_failed("category"));
            render_page(state, layout, form, id).await
        }
    }
}

/// Delete confirmation page.
///
/// GET /categories/{id}/delete
#[instrument(skip(admin, state, session))]
pub async fn confirm_delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<CategoryId>,
) -> Response {
    if !admin.permissions().can_delete {
        return deny_delete(&session).await.into_response();
    }

    match CategoryRepository::new(state.pool()).get_by_id(id).await {
        Ok(category) => {
            let template = ConfirmDeleteTemplate {
                layout: Layout::new(&session, Some(&admin), LIST_PATH).await,
                category: CategoryView::from(&category),
            };
            render(&template).into_response()
        }
        Err(RepositoryError::NotFound) => Redirect::to(LIST_PATH).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Delete category handler.
///
/// POST /categories/{id}/delete
#[instrument(skip(admin, state, session))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<CategoryId>,
) -> Redirect {
    if !admin.permissions().can_delete {
        return deny_delete(&session).await;
    }

    let notice = match CategoryRepository::new(state.pool()).delete(id).await {
        Ok(()) => {
            state.categories().invalidate_categories().await;
            tracing::info!(category_id = %id, "Category deleted");
            Notice::deleted("Category")
        }
        Err(e) => {
            tracing::warn!(category_id = %id, "Failed to delete category: {e}");
            Notice::delete_failed("category", Some("registrations"))
        }
    };

    redirect_with(&session, notice, LIST_PATH).await
}

async fn deny_write(session: &Session) -> Redirect {
    redirect_with(
        session,
        Notice::permission_denied("modify categories"),
        LIST_PATH,
    )
    .await
}

async fn deny_delete(session: &Session) -> Redirect {
    redirect_with(
        session,
        Notice::permission_denied("delete categories"),
        LIST_PATH,
    )
    .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(name: &str, actual_fee: &str, offer_fee: &str, discount_percent: i64) -> CategoryView {
        CategoryView {
            id: "5b0c1f7e-3a52-4f0e-9d2b-8f4b1b2f6a10".to_string(),
            name: name.to_string(),
            actual_fee: actual_fee.to_string(),
            offer_fee: offer_fee.to_string(),
            discount_percent,
            is_active: true,
            is_highlighted: false,
            popup_image_url: None,
        }
    }

    #[test]
    fn test_discount_column_shows_zero_percent() {
        let page = CategoriesTemplate {
            layout: Layout {
                admin_user: None,
                notice: None,
                current_path: LIST_PATH,
                live_table: "",
            },
            categories: vec![
                row("Ration Card", "0", "0", 0),
                row("Building Permit", "500", "500", 0),
            ],
            form: CategoryForm::default(),
            editing: None,
            form_action: LIST_PATH.to_string(),
        };

        let html = page.render().unwrap();
        assert_eq!(html.matches("0% OFF").count(), 2);
        assert!(html.contains("No image"));
    }
}
