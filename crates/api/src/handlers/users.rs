//! Handlers for the `/users` resource: admin-managed user records plus the
//! self-service `/users/me` alias.
//!
//! Admin routes look users up by username. The `me` routes act on the
//! authenticated actor and never change the stored role, regardless of what
//! the payload carries.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use critica_core::error::CoreError;
use critica_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use critica_core::policy::{Action, Resource};
use critica_core::role::{Role, ROLE_USER};
use critica_core::validation::{validate_email, validate_username};
use critica_db::models::user::{CreateUser, UpdateUser, User, UserListParams, UserResponse};
use critica_db::repositories::UserRepo;

use crate::authz::ensure_allowed;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    /// Role name; defaults to `user` when omitted.
    pub role: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

/// Request body for `PATCH /users/{username}` (admin).
#[derive(Debug, Deserialize)]
pub struct AdminUpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

/// Request body for `PATCH /users/me`.
///
/// `role` is accepted for payload compatibility but never applied; the
/// stored role is preserved on every self-update.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    #[allow(dead_code)]
    pub role: Option<String>,
}

// ---------------------------------------------------------------------------
// Admin handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users
///
/// List users with optional username search. Admin only.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let users = UserRepo::list(&state.pool, &params, limit, offset).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/v1/users
///
/// Create a user with an explicit role. Admin only.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validate_username(&input.username)?;
    validate_email(&input.email)?;
    let role = parse_role(input.role.as_deref())?;

    let create = CreateUser {
        username: input.username,
        email: input.email,
        role: role.as_str().to_string(),
        first_name: input.first_name,
        last_name: input.last_name,
        bio: input.bio,
    };
    let user = UserRepo::create(&state.pool, &create).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /api/v1/users/{username}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(username): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = find_by_username(&state, &username).await?;
    Ok(Json(UserResponse::from(user)))
}

/// PATCH /api/v1/users/{username}
///
/// Update any of a user's fields, including the role. Admin only.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(username): Path<String>,
    Json(input): Json<AdminUpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    if let Some(ref new_username) = input.username {
        validate_username(new_username)?;
    }
    if let Some(ref new_email) = input.email {
        validate_email(new_email)?;
    }
    let role = match input.role.as_deref() {
        Some(role) => Some(parse_role(Some(role))?.as_str().to_string()),
        None => None,
    };

    let user = find_by_username(&state, &username).await?;
    let update = UpdateUser {
        username: input.username,
        email: input.email,
        role,
        first_name: input.first_name,
        last_name: input.last_name,
        bio: input.bio,
    };
    let updated = UserRepo::update(&state.pool, user.id, &update)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &username))?;

    Ok(Json(UserResponse::from(updated)))
}

/// DELETE /api/v1/users/{username}
///
/// Delete a user. Their reviews and comments go with them (cascade).
/// Returns 204 No Content.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(username): Path<String>,
) -> AppResult<StatusCode> {
    let user = find_by_username(&state, &username).await?;
    UserRepo::delete(&state.pool, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Self-service handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users/me
///
/// The authenticated actor's own profile, any role.
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<UserResponse>> {
    ensure_allowed(&user.actor(), Action::Retrieve, &Resource::OwnProfile)?;

    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", user.user_id.to_string()))?;
    Ok(Json(UserResponse::from(row)))
}

/// PATCH /api/v1/users/me
///
/// Partial update of the actor's own profile. The role field in the payload
/// is silently dropped: the stored role always survives a self-update.
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    ensure_allowed(&user.actor(), Action::Update, &Resource::OwnProfile)?;

    if let Some(ref new_username) = input.username {
        validate_username(new_username)?;
    }
    if let Some(ref new_email) = input.email {
        validate_email(new_email)?;
    }

    let update = UpdateUser {
        username: input.username,
        email: input.email,
        role: None,
        first_name: input.first_name,
        last_name: input.last_name,
        bio: input.bio,
    };
    let updated = UserRepo::update(&state.pool, user.user_id, &update)
        .await?
        .ok_or_else(|| CoreError::not_found("User", user.user_id.to_string()))?;

    Ok(Json(UserResponse::from(updated)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a user by username or return 404.
async fn find_by_username(state: &AppState, username: &str) -> Result<User, AppError> {
    UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| CoreError::not_found("User", username).into())
}

/// Parse an optional role name, defaulting to `user`.
fn parse_role(role: Option<&str>) -> Result<Role, AppError> {
    Ok(Role::from_str(role.unwrap_or(ROLE_USER))?)
}
