//! Comment model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use critica_core::types::{DbId, Timestamp};

/// A comment row joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub review_id: DbId,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    /// Author's username (joined from `users`).
    pub author: String,
    pub text: String,
    pub created_at: Timestamp,
    #[serde(skip_serializing)]
    pub updated_at: Timestamp,
}

/// Record for inserting a comment.
#[derive(Debug, Clone)]
pub struct CreateCommentRecord {
    pub review_id: DbId,
    pub author_id: DbId,
    pub text: String,
}
