//! Handlers for the `/titles` resource.
//!
//! Reads are public and carry the SQL-computed rating plus the joined
//! category and genres. Writes require the admin tier, validate the year
//! against the current calendar year, and resolve category/genre slugs to
//! ids before touching the store.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Datelike, Utc};
use serde::Deserialize;

use critica_core::error::CoreError;
use critica_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use critica_core::policy::{Action, Resource};
use critica_core::types::DbId;
use critica_core::validation::{validate_name, validate_year, MAX_TITLE_NAME_LENGTH};
use critica_db::models::title::{
    CreateTitleRecord, GenreRef, TitleListParams, TitleResponse, TitleRow, UpdateTitleRecord,
};
use critica_db::repositories::{CategoryRepo, GenreRepo, TitleRepo};

use crate::authz::ensure_allowed;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeActor;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /titles`. Category and genres are referenced by
/// slug, as the catalog's write surface has always done.
#[derive(Debug, Deserialize)]
pub struct CreateTitleRequest {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Request body for `PATCH /titles/{id}`. A present `genres` list replaces
/// the title's genre set.
#[derive(Debug, Deserialize)]
pub struct UpdateTitleRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genres: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/titles
///
/// List titles filtered by category slug, genre slug, name substring, and
/// exact year. Public.
pub async fn list_titles(
    MaybeActor(actor): MaybeActor,
    State(state): State<AppState>,
    Query(params): Query<TitleListParams>,
) -> AppResult<Json<Vec<TitleResponse>>> {
    ensure_allowed(&actor, Action::List, &Resource::Title)?;

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let rows = TitleRepo::list(&state.pool, &params, limit, offset).await?;
    let responses = attach_genres(&state, rows).await?;
    Ok(Json(responses))
}

/// POST /api/v1/titles
///
/// Create a title. Admin only. The year must not exceed the current
/// calendar year.
pub async fn create_title(
    MaybeActor(actor): MaybeActor,
    State(state): State<AppState>,
    Json(input): Json<CreateTitleRequest>,
) -> AppResult<(StatusCode, Json<TitleResponse>)> {
    ensure_allowed(&actor, Action::Create, &Resource::Title)?;

    validate_name(&input.name, MAX_TITLE_NAME_LENGTH)?;
    validate_year(input.year, Utc::now().year())?;

    let category_id = resolve_category(&state, &input.category).await?;
    let genre_ids = resolve_genres(&state, &input.genres).await?;

    let record = CreateTitleRecord {
        name: input.name,
        year: input.year,
        description: input.description,
        category_id: Some(category_id),
    };
    let id = TitleRepo::create(&state.pool, &record, &genre_ids).await?;

    let response = fetch_title_response(&state, id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/titles/{id}
pub async fn get_title(
    MaybeActor(actor): MaybeActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TitleResponse>> {
    ensure_allowed(&actor, Action::Retrieve, &Resource::Title)?;
    Ok(Json(fetch_title_response(&state, id).await?))
}

/// PATCH /api/v1/titles/{id}
///
/// Partial update. Admin only. Year, when present, is re-validated at
/// write time.
pub async fn update_title(
    MaybeActor(actor): MaybeActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTitleRequest>,
) -> AppResult<Json<TitleResponse>> {
    ensure_allowed(&actor, Action::Update, &Resource::Title)?;

    if let Some(ref name) = input.name {
        validate_name(name, MAX_TITLE_NAME_LENGTH)?;
    }
    if let Some(year) = input.year {
        validate_year(year, Utc::now().year())?;
    }

    let category_id = match input.category.as_deref() {
        Some(slug) => Some(resolve_category(&state, slug).await?),
        None => None,
    };
    let genre_ids = match input.genres.as_deref() {
        Some(slugs) => Some(resolve_genres(&state, slugs).await?),
        None => None,
    };

    let record = UpdateTitleRecord {
        name: input.name,
        year: input.year,
        description: input.description,
        category_id,
    };
    let updated = TitleRepo::update(&state.pool, id, &record, genre_ids.as_deref()).await?;
    if !updated {
        return Err(CoreError::not_found("Title", id.to_string()).into());
    }

    Ok(Json(fetch_title_response(&state, id).await?))
}

/// DELETE /api/v1/titles/{id}
///
/// Delete a title together with its genre links, reviews, and comments.
/// Admin only. Returns 204 No Content.
pub async fn delete_title(
    MaybeActor(actor): MaybeActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_allowed(&actor, Action::Delete, &Resource::Title)?;

    let deleted = TitleRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("Title", id.to_string()).into())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve a category slug to its id, or fail validation on the `category`
/// field.
async fn resolve_category(state: &AppState, slug: &str) -> Result<DbId, AppError> {
    let category = CategoryRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| CoreError::validation("category", format!("Unknown category slug '{slug}'")))?;
    Ok(category.id)
}

/// Resolve genre slugs to ids, or fail validation naming the first missing
/// slug.
async fn resolve_genres(state: &AppState, slugs: &[String]) -> Result<Vec<DbId>, AppError> {
    if slugs.is_empty() {
        return Ok(Vec::new());
    }

    let found = GenreRepo::find_by_slugs(&state.pool, slugs).await?;
    let by_slug: HashMap<&str, DbId> = found.iter().map(|g| (g.slug.as_str(), g.id)).collect();

    let mut ids = Vec::with_capacity(slugs.len());
    for slug in slugs {
        match by_slug.get(slug.as_str()) {
            Some(id) => {
                if !ids.contains(id) {
                    ids.push(*id);
                }
            }
            None => {
                return Err(
                    CoreError::validation("genres", format!("Unknown genre slug '{slug}'")).into(),
                )
            }
        }
    }
    Ok(ids)
}

/// Fetch one title with genres attached, or 404.
async fn fetch_title_response(state: &AppState, id: DbId) -> Result<TitleResponse, AppError> {
    let row = TitleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Title", id.to_string()))?;
    let mut responses = attach_genres(state, vec![row]).await?;
    responses
        .pop()
        .ok_or_else(|| AppError::InternalError("Title response assembly produced no row".into()))
}

/// Stitch genre references onto a page of title rows with one extra query.
async fn attach_genres(
    state: &AppState,
    rows: Vec<TitleRow>,
) -> Result<Vec<TitleResponse>, AppError> {
    let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
    let mut genres_by_title: HashMap<DbId, Vec<GenreRef>> = HashMap::new();

    if !ids.is_empty() {
        for link in TitleRepo::genres_for_title_ids(&state.pool, &ids).await? {
            genres_by_title
                .entry(link.title_id)
                .or_default()
                .push(GenreRef {
                    name: link.name,
                    slug: link.slug,
                });
        }
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let genres = genres_by_title.remove(&row.id).unwrap_or_default();
            TitleResponse::from_row(row, genres)
        })
        .collect())
}
