//! Handlers for the `/titles/{title_id}/reviews/{review_id}/comments`
//! resource.
//!
//! Same permission shape as reviews: public reads, authenticated creation,
//! author/moderator/admin mutation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use critica_core::error::CoreError;
use critica_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use critica_core::policy::{Action, Resource};
use critica_core::types::DbId;
use critica_core::validation::validate_text;
use critica_db::models::comment::{Comment, CreateCommentRecord};
use critica_db::repositories::CommentRepo;

use crate::authz::ensure_allowed;
use crate::error::{AppError, AppResult};
use crate::handlers::reviews::find_review;
use crate::middleware::auth::{AuthUser, MaybeActor};
use crate::query::PaginationParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for creating a comment.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

/// Request body for patching a comment.
#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub text: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments
///
/// List a review's comments, newest first. Public.
pub async fn list_comments(
    MaybeActor(actor): MaybeActor,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<Comment>>> {
    ensure_allowed(&actor, Action::List, &Resource::Comment { author_id: None })?;
    find_review(&state, title_id, review_id).await?;

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let comments = CommentRepo::list_for_review(&state.pool, review_id, limit, offset).await?;
    Ok(Json(comments))
}

/// POST /api/v1/titles/{title_id}/reviews/{review_id}/comments
///
/// Comment on a review. Any authenticated actor.
pub async fn create_comment(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    user: AuthUser,
    Json(input): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    ensure_allowed(
        &user.actor(),
        Action::Create,
        &Resource::Comment { author_id: None },
    )?;
    find_review(&state, title_id, review_id).await?;

    validate_text(&input.text)?;

    let record = CreateCommentRecord {
        review_id,
        author_id: user.user_id,
        text: input.text,
    };
    let comment = CommentRepo::create(&state.pool, &record).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn get_comment(
    MaybeActor(actor): MaybeActor,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<Json<Comment>> {
    let comment = find_comment(&state, title_id, review_id, comment_id).await?;
    ensure_allowed(
        &actor,
        Action::Retrieve,
        &Resource::Comment {
            author_id: Some(comment.author_id),
        },
    )?;
    Ok(Json(comment))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
///
/// Edit a comment. Author, moderator, or admin.
pub async fn update_comment(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
    user: AuthUser,
    Json(input): Json<UpdateCommentRequest>,
) -> AppResult<Json<Comment>> {
    let comment = find_comment(&state, title_id, review_id, comment_id).await?;
    ensure_allowed(
        &user.actor(),
        Action::Update,
        &Resource::Comment {
            author_id: Some(comment.author_id),
        },
    )?;

    if let Some(ref text) = input.text {
        validate_text(text)?;
    }

    let updated = CommentRepo::update_text(&state.pool, comment_id, input.text.as_deref())
        .await?
        .ok_or_else(|| CoreError::not_found("Comment", comment_id.to_string()))?;

    Ok(Json(updated))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
///
/// Delete a comment. Author, moderator, or admin. Returns 204 No Content.
pub async fn delete_comment(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
    user: AuthUser,
) -> AppResult<StatusCode> {
    let comment = find_comment(&state, title_id, review_id, comment_id).await?;
    ensure_allowed(
        &user.actor(),
        Action::Delete,
        &Resource::Comment {
            author_id: Some(comment.author_id),
        },
    )?;

    CommentRepo::delete(&state.pool, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a comment scoped to its review (and the review to its title),
/// or 404.
async fn find_comment(
    state: &AppState,
    title_id: DbId,
    review_id: DbId,
    comment_id: DbId,
) -> Result<Comment, AppError> {
    find_review(state, title_id, review_id).await?;
    CommentRepo::find_for_review(&state.pool, review_id, comment_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Comment", comment_id.to_string()).into())
}
