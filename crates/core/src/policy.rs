//! Access policy engine.
//!
//! A single pure function maps (actor, action, resource) to allow/deny.
//! Rules are evaluated in fixed precedence: admin/moderator override, then
//! author ownership, then the anonymous read-only fallback. The engine
//! never errors and never panics; an anonymous actor is ordinary input.

use crate::actor::Actor;
use crate::types::DbId;

/// The action being attempted. `List` and `Retrieve` are SAFE (read-only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
}

impl Action {
    /// SAFE operations are reads that any actor may perform on public
    /// resources.
    pub fn is_safe(self) -> bool {
        matches!(self, Action::List | Action::Retrieve)
    }
}

/// The resource an action targets.
///
/// Review and Comment carry their author so ownership can be decided
/// without a second lookup. `author_id` is `None` for collection-level
/// actions (list, create) where no owned instance exists yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Category,
    Genre,
    Title,
    /// A user record managed through the admin surface.
    User,
    /// The calling user's own profile (the `me` alias). The role field is
    /// never writable through this path; handlers preserve the stored role.
    OwnProfile,
    Review { author_id: Option<DbId> },
    Comment { author_id: Option<DbId> },
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

/// Decide whether `actor` may perform `action` on `resource`.
pub fn authorize(actor: &Actor, action: Action, resource: &Resource) -> Decision {
    match resource {
        // Catalog: world-readable, admin-writable.
        Resource::Category | Resource::Genre | Resource::Title => {
            if action.is_safe() || actor.is_admin() {
                Decision::Allow
            } else {
                Decision::Deny
            }
        }

        // User records: admin only, reads included.
        Resource::User => {
            if actor.is_admin() {
                Decision::Allow
            } else {
                Decision::Deny
            }
        }

        // Own profile: any authenticated actor, any role.
        Resource::OwnProfile => {
            if actor.is_authenticated() {
                Decision::Allow
            } else {
                Decision::Deny
            }
        }

        // Feedback: world-readable; writes for moderators/admins or the
        // author. Creation has no owner yet, so any authenticated actor
        // may create.
        Resource::Review { author_id } | Resource::Comment { author_id } => {
            if action.is_safe() {
                return Decision::Allow;
            }
            if !actor.is_authenticated() {
                return Decision::Deny;
            }
            if actor.is_admin() || actor.is_moderator() {
                return Decision::Allow;
            }
            match action {
                Action::Create => Decision::Allow,
                _ => {
                    if author_id.is_some() && actor.id() == *author_id {
                        Decision::Allow
                    } else {
                        Decision::Deny
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;

    fn user(id: DbId) -> Actor {
        Actor::Authenticated {
            id,
            role: Role::User,
            is_superuser: false,
        }
    }

    fn moderator(id: DbId) -> Actor {
        Actor::Authenticated {
            id,
            role: Role::Moderator,
            is_superuser: false,
        }
    }

    fn admin(id: DbId) -> Actor {
        Actor::Authenticated {
            id,
            role: Role::Admin,
            is_superuser: false,
        }
    }

    #[test]
    fn test_anonymous_may_read_catalog_and_feedback() {
        let anon = Actor::Anonymous;
        for resource in [
            Resource::Category,
            Resource::Genre,
            Resource::Title,
            Resource::Review { author_id: Some(7) },
            Resource::Comment { author_id: Some(7) },
        ] {
            assert_eq!(authorize(&anon, Action::List, &resource), Decision::Allow);
            assert_eq!(
                authorize(&anon, Action::Retrieve, &resource),
                Decision::Allow
            );
        }
    }

    #[test]
    fn test_anonymous_may_not_write_anything() {
        let anon = Actor::Anonymous;
        for resource in [
            Resource::Category,
            Resource::Genre,
            Resource::Title,
            Resource::User,
            Resource::OwnProfile,
            Resource::Review { author_id: Some(7) },
            Resource::Comment { author_id: Some(7) },
        ] {
            for action in [Action::Create, Action::Update, Action::Delete] {
                assert_eq!(authorize(&anon, action, &resource), Decision::Deny);
            }
        }
    }

    #[test]
    fn test_catalog_writes_require_admin() {
        for resource in [Resource::Category, Resource::Genre, Resource::Title] {
            assert_eq!(
                authorize(&user(1), Action::Create, &resource),
                Decision::Deny
            );
            assert_eq!(
                authorize(&moderator(1), Action::Create, &resource),
                Decision::Deny
            );
            assert_eq!(
                authorize(&admin(1), Action::Create, &resource),
                Decision::Allow
            );
        }
    }

    #[test]
    fn test_superuser_flag_grants_catalog_writes() {
        let su = Actor::Authenticated {
            id: 1,
            role: Role::User,
            is_superuser: true,
        };
        assert_eq!(
            authorize(&su, Action::Delete, &Resource::Title),
            Decision::Allow
        );
    }

    #[test]
    fn test_user_records_are_admin_only_even_for_reads() {
        assert_eq!(authorize(&user(1), Action::List, &Resource::User), Decision::Deny);
        assert_eq!(
            authorize(&moderator(1), Action::List, &Resource::User),
            Decision::Deny
        );
        assert_eq!(authorize(&admin(1), Action::List, &Resource::User), Decision::Allow);
        assert_eq!(
            authorize(&admin(1), Action::Delete, &Resource::User),
            Decision::Allow
        );
    }

    #[test]
    fn test_own_profile_allowed_for_any_authenticated_role() {
        for actor in [user(1), moderator(2), admin(3)] {
            assert_eq!(
                authorize(&actor, Action::Retrieve, &Resource::OwnProfile),
                Decision::Allow
            );
            assert_eq!(
                authorize(&actor, Action::Update, &Resource::OwnProfile),
                Decision::Allow
            );
        }
        assert_eq!(
            authorize(&Actor::Anonymous, Action::Retrieve, &Resource::OwnProfile),
            Decision::Deny
        );
    }

    #[test]
    fn test_author_may_edit_own_review_but_not_anothers() {
        let author = user(5);
        let other = user(6);
        let review = Resource::Review { author_id: Some(5) };
        assert_eq!(authorize(&author, Action::Update, &review), Decision::Allow);
        assert_eq!(authorize(&author, Action::Delete, &review), Decision::Allow);
        assert_eq!(authorize(&other, Action::Update, &review), Decision::Deny);
        assert_eq!(authorize(&other, Action::Delete, &review), Decision::Deny);
    }

    #[test]
    fn test_user_deleting_anothers_comment_denied_moderator_allowed() {
        let comment = Resource::Comment { author_id: Some(9) };
        assert_eq!(
            authorize(&user(1), Action::Delete, &comment),
            Decision::Deny
        );
        assert_eq!(
            authorize(&moderator(1), Action::Delete, &comment),
            Decision::Allow
        );
        assert_eq!(authorize(&admin(1), Action::Delete, &comment), Decision::Allow);
    }

    #[test]
    fn test_any_authenticated_actor_may_create_feedback() {
        // author_id on Create is the prospective author; ownership does not
        // gate creation.
        let review = Resource::Review { author_id: None };
        assert_eq!(authorize(&user(1), Action::Create, &review), Decision::Allow);
        assert_eq!(authorize(&user(2), Action::Create, &review), Decision::Allow);
    }
}
