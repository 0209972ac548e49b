//! Handlers for the `/categories` resource.
//!
//! World-readable; writes require the admin tier (decided by the policy
//! engine, not the router).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use critica_core::error::CoreError;
use critica_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use critica_core::policy::{Action, Resource};
use critica_core::validation::{validate_name, validate_slug, MAX_CATALOG_NAME_LENGTH};
use critica_db::models::category::{CatalogListParams, Category, CreateCategory};
use critica_db::repositories::CategoryRepo;

use crate::authz::ensure_allowed;
use crate::error::AppResult;
use crate::middleware::auth::MaybeActor;
use crate::state::AppState;

/// GET /api/v1/categories
///
/// List categories with optional name search. Public.
pub async fn list_categories(
    MaybeActor(actor): MaybeActor,
    State(state): State<AppState>,
    Query(params): Query<CatalogListParams>,
) -> AppResult<Json<Vec<Category>>> {
    ensure_allowed(&actor, Action::List, &Resource::Category)?;

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let categories = CategoryRepo::list(&state.pool, params.search.as_deref(), limit, offset).await?;
    Ok(Json(categories))
}

/// POST /api/v1/categories
///
/// Create a category. Admin only.
pub async fn create_category(
    MaybeActor(actor): MaybeActor,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    ensure_allowed(&actor, Action::Create, &Resource::Category)?;

    validate_name(&input.name, MAX_CATALOG_NAME_LENGTH)?;
    validate_slug(&input.slug)?;

    let category = CategoryRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// DELETE /api/v1/categories/{slug}
///
/// Delete a category. Titles referencing it keep their rows with a null
/// category. Admin only. Returns 204 No Content.
pub async fn delete_category(
    MaybeActor(actor): MaybeActor,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    ensure_allowed(&actor, Action::Delete, &Resource::Category)?;

    let deleted = CategoryRepo::delete_by_slug(&state.pool, &slug).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("Category", &slug).into())
    }
}
