//! Repository for the `comments` table.

use sqlx::PgPool;

use critica_core::types::DbId;

use crate::models::comment::{Comment, CreateCommentRecord};

/// Shared SELECT head: comment columns plus the author's username.
const SELECT_HEAD: &str = "SELECT c.id, c.review_id, c.author_id, u.username AS author, \
        c.text, c.created_at, c.updated_at \
     FROM comments c \
     JOIN users u ON u.id = c.author_id";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCommentRecord,
    ) -> Result<Comment, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO comments (review_id, author_id, text)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(input.review_id)
        .bind(input.author_id)
        .bind(&input.text)
        .fetch_one(pool)
        .await?;

        let query = format!("{SELECT_HEAD} WHERE c.id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a comment scoped to its review (nested-route lookup).
    pub async fn find_for_review(
        pool: &PgPool,
        review_id: DbId,
        id: DbId,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("{SELECT_HEAD} WHERE c.id = $1 AND c.review_id = $2");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(review_id)
            .fetch_optional(pool)
            .await
    }

    /// List a review's comments, newest first.
    pub async fn list_for_review(
        pool: &PgPool,
        review_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "{SELECT_HEAD}
             WHERE c.review_id = $1
             ORDER BY c.created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(review_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Patch a comment's text. Returns `None` if no row matches.
    pub async fn update_text(
        pool: &PgPool,
        id: DbId,
        text: Option<&str>,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE comments SET
                text = COALESCE($2, text),
                updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(text)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => {
                let query = format!("{SELECT_HEAD} WHERE c.id = $1");
                sqlx::query_as::<_, Comment>(&query)
                    .bind(id)
                    .fetch_optional(pool)
                    .await
            }
            None => Ok(None),
        }
    }

    /// Delete a comment. Returns `true` if the row existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
