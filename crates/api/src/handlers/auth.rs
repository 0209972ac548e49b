//! Handlers for the `/auth` resource (signup and confirmation-code exchange).
//!
//! The flow is `Requested -> CodeIssued -> Exchanged`: signup validates the
//! (username, email) pair and emails a confirmation code; the token endpoint
//! verifies the code against the user's current state and issues an access
//! token. A failed exchange is terminal for that call; the caller restarts
//! at signup.

use std::str::FromStr;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use critica_core::confirmation::{issue_code, verify_code, UserSnapshot};
use critica_core::error::CoreError;
use critica_core::role::{Role, ROLE_USER};
use critica_core::validation::{validate_email, validate_username};
use critica_db::models::user::{CreateUser, User};
use critica_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
}

/// Response body for a successful signup: the accepted pair, echoed back.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub username: String,
    pub email: String,
}

/// Request body for `POST /auth/token`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub confirmation_code: String,
}

/// Response body carrying the bearer credential.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register a (username, email) pair and email a confirmation code.
/// Repeating a signup with the exact same pair is idempotent: no new row,
/// a fresh code for the existing user.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    // 1. Field validation (rejects the reserved username "me").
    validate_username(&input.username)?;
    validate_email(&input.email)?;

    // 2. Exact match is an idempotent re-request.
    let user = match UserRepo::find_by_username_and_email(
        &state.pool,
        &input.username,
        &input.email,
    )
    .await?
    {
        Some(existing) => existing,
        None => {
            // 3. Partial collisions are field-specific conflicts; a username
            //    collision wins when both fields collide.
            if UserRepo::find_by_username(&state.pool, &input.username)
                .await?
                .is_some()
            {
                return Err(CoreError::conflict("username", "This username is already taken").into());
            }
            if UserRepo::find_by_email(&state.pool, &input.email)
                .await?
                .is_some()
            {
                return Err(CoreError::conflict("email", "This email is already registered").into());
            }

            // 4. Insert. A constraint race surfaces through the 23505
            //    classifier as the same field-specific conflict.
            let create = CreateUser {
                username: input.username.clone(),
                email: input.email.clone(),
                role: ROLE_USER.to_string(),
                first_name: None,
                last_name: None,
                bio: None,
            };
            UserRepo::create(&state.pool, &create).await?
        }
    };

    // 5. Issue a code bound to the user's current state and deliver it.
    let code = issue_code(
        &snapshot_of(&user)?,
        state.config.jwt.secret.as_bytes(),
        Utc::now(),
    );
    state
        .mailer
        .send_confirmation_code(&user.email, &user.username, &code)
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Confirmation code issued");

    Ok(Json(SignupResponse {
        username: user.username,
        email: user.email,
    }))
}

/// POST /api/v1/auth/token
///
/// Exchange a username + confirmation code for an access token. An unknown
/// username is 404; a code that does not verify against the user's current
/// state is rejected without issuing a token.
pub async fn obtain_token(
    State(state): State<AppState>,
    Json(input): Json<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &input.username))?;

    verify_code(
        &snapshot_of(&user)?,
        state.config.jwt.secret.as_bytes(),
        &input.confirmation_code,
        Utc::now(),
        state.config.confirmation_max_age_hours,
    )?;

    let token = generate_access_token(user.id, &user.role, user.is_superuser, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, username = %user.username, "Access token issued");

    Ok(Json(TokenResponse { token }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The confirmation-code state snapshot for a user row.
fn snapshot_of(user: &User) -> Result<UserSnapshot<'_>, AppError> {
    let role = Role::from_str(&user.role).map_err(|_| {
        AppError::InternalError(format!(
            "User {} has unknown role '{}' in storage",
            user.id, user.role
        ))
    })?;
    Ok(UserSnapshot {
        id: user.id,
        username: &user.username,
        email: &user.email,
        role,
        is_superuser: user.is_superuser,
    })
}
