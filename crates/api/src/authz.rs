//! API-side authorization guard.
//!
//! Bridges the pure policy engine in `critica_core::policy` to HTTP errors:
//! a denied anonymous actor maps to 401, a denied authenticated actor to
//! 403. Handlers call this before touching the store.

use critica_core::actor::Actor;
use critica_core::error::CoreError;
use critica_core::policy::{authorize, Action, Resource};

use crate::error::AppError;

/// Check that `actor` may perform `action` on `resource`, mapping a denial
/// to the appropriate HTTP error.
pub fn ensure_allowed(actor: &Actor, action: Action, resource: &Resource) -> Result<(), AppError> {
    if authorize(actor, action, resource).is_allowed() {
        return Ok(());
    }
    if actor.is_authenticated() {
        Err(AppError::Core(CoreError::Forbidden(
            "You do not have permission to perform this action".into(),
        )))
    } else {
        Err(AppError::Core(CoreError::Unauthorized(
            "Authentication required".into(),
        )))
    }
}
