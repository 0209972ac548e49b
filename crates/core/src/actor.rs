//! The identity snapshot authorization decisions are made against.
//!
//! An `Actor` is constructed per request from the verified token claims (or
//! the absence of a token) and passed explicitly into the policy engine.
//! There is no global permission state.

use crate::role::Role;
use crate::types::DbId;

/// The identity performing an action. Anonymous is a valid actor, not an
/// error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    Authenticated {
        id: DbId,
        role: Role,
        /// Elevated-privilege flag, independent of `role`.
        is_superuser: bool,
    },
}

impl Actor {
    /// Admin tier: the `admin` role or the superuser flag.
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Actor::Authenticated {
                role: Role::Admin, ..
            } | Actor::Authenticated {
                is_superuser: true, ..
            }
        )
    }

    pub fn is_moderator(&self) -> bool {
        matches!(
            self,
            Actor::Authenticated {
                role: Role::Moderator,
                ..
            }
        )
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Actor::Authenticated { .. })
    }

    /// The actor's user id, if authenticated.
    pub fn id(&self) -> Option<DbId> {
        match self {
            Actor::Anonymous => None,
            Actor::Authenticated { id, .. } => Some(*id),
        }
    }
}
