//! Repository for the `reviews` table.

use sqlx::PgPool;

use critica_core::types::DbId;

use crate::models::review::{CreateReviewRecord, Review, UpdateReviewRecord};

/// Shared SELECT head: review columns plus the author's username.
const SELECT_HEAD: &str = "SELECT r.id, r.title_id, r.author_id, u.username AS author, \
        r.text, r.score, r.created_at, r.updated_at \
     FROM reviews r \
     JOIN users u ON u.id = r.author_id";

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a new review, returning the created row.
    ///
    /// The one-review-per-(title, author) invariant is enforced by
    /// `uq_reviews_title_author`; a concurrent duplicate surfaces as a
    /// database error for the caller to classify, never a second row.
    pub async fn create(pool: &PgPool, input: &CreateReviewRecord) -> Result<Review, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO reviews (title_id, author_id, text, score)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(input.title_id)
        .bind(input.author_id)
        .bind(&input.text)
        .bind(input.score)
        .fetch_one(pool)
        .await?;

        let query = format!("{SELECT_HEAD} WHERE r.id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a review scoped to its title (nested-route lookup).
    pub async fn find_for_title(
        pool: &PgPool,
        title_id: DbId,
        id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("{SELECT_HEAD} WHERE r.id = $1 AND r.title_id = $2");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(title_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether the author already reviewed the title. Only consulted on
    /// creation; updates never re-check.
    pub async fn exists_for_author(
        pool: &PgPool,
        title_id: DbId,
        author_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM reviews WHERE title_id = $1 AND author_id = $2)",
        )
        .bind(title_id)
        .bind(author_id)
        .fetch_one(pool)
        .await
    }

    /// List a title's reviews, newest first.
    pub async fn list_for_title(
        pool: &PgPool,
        title_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "{SELECT_HEAD}
             WHERE r.title_id = $1
             ORDER BY r.created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Patch a review. Returns `None` if no row matches.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReviewRecord,
    ) -> Result<Option<Review>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE reviews SET
                text = COALESCE($2, text),
                score = COALESCE($3, score),
                updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.text)
        .bind(input.score)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => {
                let query = format!("{SELECT_HEAD} WHERE r.id = $1");
                sqlx::query_as::<_, Review>(&query)
                    .bind(id)
                    .fetch_optional(pool)
                    .await
            }
            None => Ok(None),
        }
    }

    /// Delete a review. Returns `true` if the row existed. Its comments are
    /// removed by the cascading foreign key.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
