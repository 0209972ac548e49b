//! Handlers for the `/titles/{title_id}/reviews` resource.
//!
//! Reads are public. Creation requires authentication and enforces the
//! one-review-per-author-per-title invariant (pre-checked for a clean
//! error, with the unique constraint as the racing backstop). Updates and
//! deletes go to the author, moderators, and admins; the duplicate check is
//! never re-evaluated on update.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use critica_core::error::CoreError;
use critica_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use critica_core::policy::{Action, Resource};
use critica_core::types::DbId;
use critica_core::validation::{validate_score, validate_text};
use critica_db::models::review::{CreateReviewRecord, Review, UpdateReviewRecord};
use critica_db::repositories::{ReviewRepo, TitleRepo};

use crate::authz::ensure_allowed;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeActor};
use crate::query::PaginationParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /titles/{title_id}/reviews`.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub text: String,
    pub score: i16,
}

/// Request body for `PATCH /titles/{title_id}/reviews/{review_id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub text: Option<String>,
    pub score: Option<i16>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/titles/{title_id}/reviews
///
/// List a title's reviews, newest first. Public.
pub async fn list_reviews(
    MaybeActor(actor): MaybeActor,
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<Review>>> {
    ensure_allowed(&actor, Action::List, &Resource::Review { author_id: None })?;
    ensure_title_exists(&state, title_id).await?;

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let reviews = ReviewRepo::list_for_title(&state.pool, title_id, limit, offset).await?;
    Ok(Json(reviews))
}

/// POST /api/v1/titles/{title_id}/reviews
///
/// Create a review. One per author per title; a second attempt conflicts.
pub async fn create_review(
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
    user: AuthUser,
    Json(input): Json<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    ensure_allowed(
        &user.actor(),
        Action::Create,
        &Resource::Review { author_id: None },
    )?;
    ensure_title_exists(&state, title_id).await?;

    validate_text(&input.text)?;
    validate_score(input.score)?;

    // Pre-check for a clean error; the unique constraint catches the race.
    if ReviewRepo::exists_for_author(&state.pool, title_id, user.user_id).await? {
        return Err(CoreError::conflict("review", "You have already reviewed this title").into());
    }

    let record = CreateReviewRecord {
        title_id,
        author_id: user.user_id,
        text: input.text,
        score: input.score,
    };
    let review = ReviewRepo::create(&state.pool, &record).await?;

    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn get_review(
    MaybeActor(actor): MaybeActor,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Review>> {
    let review = find_review(&state, title_id, review_id).await?;
    ensure_allowed(
        &actor,
        Action::Retrieve,
        &Resource::Review {
            author_id: Some(review.author_id),
        },
    )?;
    Ok(Json(review))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}
///
/// Update a review's text and/or score. Author, moderator, or admin. The
/// duplicate-review check applies to creation only and is not re-evaluated
/// here.
pub async fn update_review(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    user: AuthUser,
    Json(input): Json<UpdateReviewRequest>,
) -> AppResult<Json<Review>> {
    let review = find_review(&state, title_id, review_id).await?;
    ensure_allowed(
        &user.actor(),
        Action::Update,
        &Resource::Review {
            author_id: Some(review.author_id),
        },
    )?;

    if let Some(ref text) = input.text {
        validate_text(text)?;
    }
    if let Some(score) = input.score {
        validate_score(score)?;
    }

    let record = UpdateReviewRecord {
        text: input.text,
        score: input.score,
    };
    let updated = ReviewRepo::update(&state.pool, review_id, &record)
        .await?
        .ok_or_else(|| CoreError::not_found("Review", review_id.to_string()))?;

    Ok(Json(updated))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}
///
/// Delete a review and its comments. Author, moderator, or admin.
/// Returns 204 No Content.
pub async fn delete_review(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    user: AuthUser,
) -> AppResult<StatusCode> {
    let review = find_review(&state, title_id, review_id).await?;
    ensure_allowed(
        &user.actor(),
        Action::Delete,
        &Resource::Review {
            author_id: Some(review.author_id),
        },
    )?;

    ReviewRepo::delete(&state.pool, review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// 404 unless the title exists.
pub(crate) async fn ensure_title_exists(state: &AppState, title_id: DbId) -> Result<(), AppError> {
    if TitleRepo::exists(&state.pool, title_id).await? {
        Ok(())
    } else {
        Err(CoreError::not_found("Title", title_id.to_string()).into())
    }
}

/// Fetch a review scoped to its title, or 404.
pub(crate) async fn find_review(
    state: &AppState,
    title_id: DbId,
    review_id: DbId,
) -> Result<Review, AppError> {
    ReviewRepo::find_for_title(&state.pool, title_id, review_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Review", review_id.to_string()).into())
}
