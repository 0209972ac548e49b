//! Category model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use critica_core::types::{DbId, Timestamp};

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing)]
    pub created_at: Timestamp,
    #[serde(skip_serializing)]
    pub updated_at: Timestamp,
}

/// DTO for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub slug: String,
}

/// Query parameters for `GET /categories` (shared with genres).
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogListParams {
    /// Substring match against name.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
