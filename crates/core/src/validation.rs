//! Field validation rules applied before any mutation.
//!
//! Each function returns `Ok(())` or a [`CoreError::Validation`] naming the
//! offending field. Shapes and limits follow the catalog's data model:
//! usernames up to 150 chars of `[\w.@+-]`, slugs up to 50 chars of
//! `[-a-zA-Z0-9_]`, scores in 1..=10, title years bounded by the current
//! calendar year.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Reserved as the self-service profile alias (`/users/me`).
pub const RESERVED_USERNAME: &str = "me";

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum slug length for categories and genres.
pub const MAX_SLUG_LENGTH: usize = 50;

/// Maximum name length for categories and genres.
pub const MAX_CATALOG_NAME_LENGTH: usize = 256;

/// Maximum name length for titles.
pub const MAX_TITLE_NAME_LENGTH: usize = 200;

/// Inclusive review score bounds.
pub const SCORE_MIN: i16 = 1;
pub const SCORE_MAX: i16 = 10;

fn username_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w.@+-]+$").expect("static regex"))
}

fn slug_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("static regex"))
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("static regex"))
}

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

/// Validate a username: non-empty, bounded, `[\w.@+-]` charset, and not the
/// reserved self-service alias.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.is_empty() {
        return Err(CoreError::validation("username", "Username must not be empty"));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(CoreError::validation(
            "username",
            format!("Username exceeds maximum length of {MAX_USERNAME_LENGTH} characters"),
        ));
    }
    if username == RESERVED_USERNAME {
        return Err(CoreError::validation(
            "username",
            format!("Username '{RESERVED_USERNAME}' is reserved and cannot be used"),
        ));
    }
    if !username_re().is_match(username) {
        return Err(CoreError::validation(
            "username",
            "Username may contain only letters, digits, and @/./+/-/_",
        ));
    }
    Ok(())
}

/// Validate an email address shape. Not an RFC parser; rejects the obvious
/// garbage before the database sees it.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.is_empty() {
        return Err(CoreError::validation("email", "Email must not be empty"));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(CoreError::validation(
            "email",
            format!("Email exceeds maximum length of {MAX_EMAIL_LENGTH} characters"),
        ));
    }
    if !email_re().is_match(email) {
        return Err(CoreError::validation(
            "email",
            format!("'{email}' is not a valid email address"),
        ));
    }
    Ok(())
}

/// Validate a category/genre slug.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::validation("slug", "Slug must not be empty"));
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(CoreError::validation(
            "slug",
            format!("Slug exceeds maximum length of {MAX_SLUG_LENGTH} characters"),
        ));
    }
    if !slug_re().is_match(slug) {
        return Err(CoreError::validation(
            "slug",
            "Slug may contain only letters, digits, hyphens, and underscores",
        ));
    }
    Ok(())
}

/// Validate a display name against a per-entity maximum length.
pub fn validate_name(name: &str, max_length: usize) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::validation("name", "Name must not be empty"));
    }
    if name.len() > max_length {
        return Err(CoreError::validation(
            "name",
            format!("Name exceeds maximum length of {max_length} characters"),
        ));
    }
    Ok(())
}

/// Validate a review score: integer in `[1, 10]` inclusive.
pub fn validate_score(score: i16) -> Result<(), CoreError> {
    if !(SCORE_MIN..=SCORE_MAX).contains(&score) {
        return Err(CoreError::validation(
            "score",
            format!("Score must be between {SCORE_MIN} and {SCORE_MAX}"),
        ));
    }
    Ok(())
}

/// Validate a title's year at write time: must not exceed the current
/// calendar year. Reads never re-validate.
pub fn validate_year(year: i32, current_year: i32) -> Result<(), CoreError> {
    if year > current_year {
        return Err(CoreError::validation(
            "year",
            format!("Year {year} is in the future (current year is {current_year})"),
        ));
    }
    Ok(())
}

/// Validate a review/comment body.
pub fn validate_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::validation("text", "Text must not be empty"));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
