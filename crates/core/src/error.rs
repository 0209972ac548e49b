//! Domain error model.
//!
//! Every error carries enough structure for the HTTP layer to name the
//! offending field in its response body. Nothing here knows about status
//! codes; the mapping lives in the api crate.

/// Domain-level error shared by the core, db, and api crates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A referenced resource does not exist. `id` is the lookup key as
    /// given by the caller (numeric id, slug, or username).
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// A field failed validation.
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// A uniqueness invariant was violated on the named field.
    #[error("{field}: {message}")]
    Conflict {
        field: &'static str,
        message: String,
    },

    /// A presented credential (confirmation code) did not verify.
    #[error("{field}: {message}")]
    InvalidCredential {
        field: &'static str,
        message: String,
    },

    /// The actor is not authenticated.
    #[error("{0}")]
    Unauthorized(String),

    /// The actor is authenticated but lacks permission.
    #[error("{0}")]
    Forbidden(String),

    /// An internal invariant failed. The message is logged, not exposed.
    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn conflict(field: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}
