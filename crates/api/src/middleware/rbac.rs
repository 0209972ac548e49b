//! Role-based access control extractor for the admin surface.
//!
//! Wraps [`AuthUser`] and rejects requests whose actor the policy engine
//! does not grant access to user records. Use in route handlers to enforce
//! authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use critica_core::error::CoreError;
use critica_core::policy::{authorize, Action, Resource};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the admin tier (the `admin` role or the superuser flag).
/// Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        // User records are admin-only for every action, so any action
        // stands in for the whole surface.
        if !authorize(&user.actor(), Action::List, &Resource::User).is_allowed() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
