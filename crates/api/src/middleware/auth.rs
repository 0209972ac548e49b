//! JWT-based authentication extractors for Axum handlers.

use std::str::FromStr;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use critica_core::actor::Actor;
use critica_core::error::CoreError;
use critica_core::role::Role;
use critica_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role (from `claims.role`).
    pub role: Role,
    /// Elevated-privilege flag (from `claims.su`).
    pub is_superuser: bool,
}

impl AuthUser {
    /// The policy-engine snapshot for this user.
    pub fn actor(&self) -> Actor {
        Actor::Authenticated {
            id: self.user_id,
            role: self.role,
            is_superuser: self.is_superuser,
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        authenticate(auth_header, state)
    }
}

/// The request's actor: authenticated when a valid Bearer token is present,
/// anonymous when the `Authorization` header is absent.
///
/// A header that is present but malformed or carries an invalid token is
/// rejected with 401 rather than downgraded to anonymous: a bad credential
/// is an error, a missing one is a valid anonymous actor.
#[derive(Debug, Clone)]
pub struct MaybeActor(pub Actor);

impl FromRequestParts<AppState> for MaybeActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts.headers.get("authorization").and_then(|v| v.to_str().ok());

        match auth_header {
            None => Ok(MaybeActor(Actor::Anonymous)),
            Some(header) => {
                let user = authenticate(header, state)?;
                Ok(MaybeActor(user.actor()))
            }
        }
    }
}

/// Validate a Bearer header value and build the authenticated user.
fn authenticate(auth_header: &str, state: &AppState) -> Result<AuthUser, AppError> {
    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        ))
    })?;

    let claims = validate_token(token, &state.config.jwt)
        .map_err(|_| AppError::Core(CoreError::Unauthorized("Invalid or expired token".into())))?;

    let role = Role::from_str(&claims.role)
        .map_err(|_| AppError::Core(CoreError::Unauthorized("Invalid or expired token".into())))?;

    Ok(AuthUser {
        user_id: claims.sub,
        role,
        is_superuser: claims.su,
    })
}
