//! Review model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use critica_core::types::{DbId, Timestamp};

/// A review row joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub title_id: DbId,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    /// Author's username (joined from `users`).
    pub author: String,
    pub text: String,
    pub score: i16,
    pub created_at: Timestamp,
    #[serde(skip_serializing)]
    pub updated_at: Timestamp,
}

/// Record for inserting a review.
#[derive(Debug, Clone)]
pub struct CreateReviewRecord {
    pub title_id: DbId,
    pub author_id: DbId,
    pub text: String,
    pub score: i16,
}

/// Record for patching a review.
#[derive(Debug, Clone, Default)]
pub struct UpdateReviewRecord {
    pub text: Option<String>,
    pub score: Option<i16>,
}
