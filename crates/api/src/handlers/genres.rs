//! Handlers for the `/genres` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use critica_core::error::CoreError;
use critica_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use critica_core::policy::{Action, Resource};
use critica_core::validation::{validate_name, validate_slug, MAX_CATALOG_NAME_LENGTH};
use critica_db::models::category::CatalogListParams;
use critica_db::models::genre::{CreateGenre, Genre};
use critica_db::repositories::GenreRepo;

use crate::authz::ensure_allowed;
use crate::error::AppResult;
use crate::middleware::auth::MaybeActor;
use crate::state::AppState;

/// GET /api/v1/genres
///
/// List genres with optional name search. Public.
pub async fn list_genres(
    MaybeActor(actor): MaybeActor,
    State(state): State<AppState>,
    Query(params): Query<CatalogListParams>,
) -> AppResult<Json<Vec<Genre>>> {
    ensure_allowed(&actor, Action::List, &Resource::Genre)?;

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let genres = GenreRepo::list(&state.pool, params.search.as_deref(), limit, offset).await?;
    Ok(Json(genres))
}

/// POST /api/v1/genres
///
/// Create a genre. Admin only.
pub async fn create_genre(
    MaybeActor(actor): MaybeActor,
    State(state): State<AppState>,
    Json(input): Json<CreateGenre>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    ensure_allowed(&actor, Action::Create, &Resource::Genre)?;

    validate_name(&input.name, MAX_CATALOG_NAME_LENGTH)?;
    validate_slug(&input.slug)?;

    let genre = GenreRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

/// DELETE /api/v1/genres/{slug}
///
/// Delete a genre; its title links go with it. Admin only.
/// Returns 204 No Content.
pub async fn delete_genre(
    MaybeActor(actor): MaybeActor,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    ensure_allowed(&actor, Action::Delete, &Resource::Genre)?;

    let deleted = GenreRepo::delete_by_slug(&state.pool, &slug).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("Genre", &slug).into())
    }
}
