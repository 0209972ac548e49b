//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`auth::MaybeActor`] -- Like `AuthUser`, but a missing header yields an
//!   anonymous actor instead of a rejection.
//! - [`rbac::RequireAdmin`] -- Requires the admin tier.

pub mod auth;
pub mod rbac;
