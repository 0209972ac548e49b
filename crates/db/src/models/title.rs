//! Title model and DTOs.
//!
//! Titles are read through [`TitleRow`], which carries the SQL-computed
//! review-score average and the joined category columns; the API layer
//! stitches in genres (fetched per page, not per row) to build
//! [`TitleResponse`].

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use critica_core::types::{DbId, Timestamp};

/// A title row joined with its category and average review score.
#[derive(Debug, Clone, FromRow)]
pub struct TitleRow {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    /// `AVG(reviews.score)`, NULL when the title has no reviews.
    pub rating: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Category reference embedded in a title response.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRef {
    pub name: String,
    pub slug: String,
}

/// Genre reference embedded in a title response.
#[derive(Debug, Clone, Serialize)]
pub struct GenreRef {
    pub name: String,
    pub slug: String,
}

/// A genre link row used to stitch genres onto a page of titles.
#[derive(Debug, Clone, FromRow)]
pub struct TitleGenreRow {
    pub title_id: DbId,
    pub name: String,
    pub slug: String,
}

/// Full title representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct TitleResponse {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub category: Option<CategoryRef>,
    pub genres: Vec<GenreRef>,
}

impl TitleResponse {
    /// Build a response from a joined row and its genre references.
    pub fn from_row(row: TitleRow, genres: Vec<GenreRef>) -> Self {
        let category = match (row.category_name, row.category_slug) {
            (Some(name), Some(slug)) => Some(CategoryRef { name, slug }),
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            year: row.year,
            rating: row.rating,
            description: row.description,
            category,
            genres,
        }
    }
}

/// Record for inserting a title. Slugs are resolved to ids by the handler.
#[derive(Debug, Clone)]
pub struct CreateTitleRecord {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
}

/// Record for patching a title. Only non-`None` fields are applied; the
/// genre link set is replaced separately when the request names genres.
#[derive(Debug, Clone, Default)]
pub struct UpdateTitleRecord {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
}

/// Filter parameters for `GET /titles`, matching the original catalog's
/// filter set: category slug, genre slug, name substring, exact year.
#[derive(Debug, Clone, Deserialize)]
pub struct TitleListParams {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
