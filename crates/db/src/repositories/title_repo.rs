//! Repository for the `titles` table and its genre links.
//!
//! Reads join the category and compute the review-score average in SQL.
//! Writes that touch both the row and the link table run in a single
//! transaction.

use sqlx::PgPool;

use critica_core::types::DbId;

use crate::models::title::{
    CreateTitleRecord, TitleGenreRow, TitleListParams, TitleRow, UpdateTitleRecord,
};

/// Shared SELECT head: title columns, joined category, computed rating.
const SELECT_HEAD: &str = "SELECT t.id, t.name, t.year, t.description, t.category_id, \
        c.name AS category_name, c.slug AS category_slug, \
        (SELECT AVG(r.score)::float8 FROM reviews r WHERE r.title_id = t.id) AS rating, \
        t.created_at, t.updated_at \
     FROM titles t \
     LEFT JOIN categories c ON c.id = t.category_id";

/// Provides CRUD operations for titles.
pub struct TitleRepo;

impl TitleRepo {
    /// Insert a title and its genre links in one transaction, returning the
    /// new id.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTitleRecord,
        genre_ids: &[DbId],
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO titles (name, year, description, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_one(&mut *tx)
        .await?;

        for genre_id in genre_ids {
            sqlx::query(
                "INSERT INTO title_genres (title_id, genre_id)
                 VALUES ($1, $2)
                 ON CONFLICT ON CONSTRAINT uq_title_genres_pair DO NOTHING",
            )
            .bind(id)
            .bind(genre_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(id)
    }

    /// Find a title by id, with category and rating.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TitleRow>, sqlx::Error> {
        let query = format!("{SELECT_HEAD} WHERE t.id = $1");
        sqlx::query_as::<_, TitleRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a title with the given id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM titles WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List titles ordered by name, filtered by category slug, genre slug,
    /// name substring, and exact year.
    pub async fn list(
        pool: &PgPool,
        params: &TitleListParams,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TitleRow>, sqlx::Error> {
        let query = format!(
            "{SELECT_HEAD}
             WHERE ($1::text IS NULL OR c.slug = $1)
               AND ($2::text IS NULL OR EXISTS (
                     SELECT 1 FROM title_genres tg
                     JOIN genres g ON g.id = tg.genre_id
                     WHERE tg.title_id = t.id AND g.slug = $2))
               AND ($3::text IS NULL OR t.name ILIKE '%' || $3 || '%')
               AND ($4::int4 IS NULL OR t.year = $4)
             ORDER BY t.name
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, TitleRow>(&query)
            .bind(&params.category)
            .bind(&params.genre)
            .bind(&params.name)
            .bind(params.year)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Fetch genre references for a page of titles in one query.
    pub async fn genres_for_title_ids(
        pool: &PgPool,
        title_ids: &[DbId],
    ) -> Result<Vec<TitleGenreRow>, sqlx::Error> {
        sqlx::query_as::<_, TitleGenreRow>(
            "SELECT tg.title_id, g.name, g.slug
             FROM title_genres tg
             JOIN genres g ON g.id = tg.genre_id
             WHERE tg.title_id = ANY($1)
             ORDER BY g.name",
        )
        .bind(title_ids)
        .fetch_all(pool)
        .await
    }

    /// Patch a title; when `genre_ids` is `Some`, the link set is replaced
    /// in the same transaction. Returns `false` if the title does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTitleRecord,
        genre_ids: Option<&[DbId]>,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE titles SET
                name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = COALESCE($4, description),
                category_id = COALESCE($5, category_id),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        if let Some(genre_ids) = genre_ids {
            sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for genre_id in genre_ids {
                sqlx::query("INSERT INTO title_genres (title_id, genre_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(genre_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a title. Returns `true` if the row existed. Genre links,
    /// reviews, and their comments are removed by the cascading foreign keys.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
