//! HTTP-level integration tests for the catalog: categories, genres, and
//! titles, including year validation and permission boundaries.

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Utc};
use common::{
    body_json, build_test_app, create_test_user, delete_anon, delete_auth, get, post_json,
    post_json_auth, token_for,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a category and a pair of genres as the given admin token.
async fn seed_catalog(pool: &PgPool, token: &str) {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/categories",
        token,
        serde_json::json!({ "name": "Films", "slug": "films" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    for (name, slug) in [("Drama", "drama"), ("Comedy", "comedy")] {
        let response = post_json_auth(
            build_test_app(pool.clone()),
            "/api/v1/genres",
            token,
            serde_json::json!({ "name": name, "slug": slug }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

// ---------------------------------------------------------------------------
// Categories & genres
// ---------------------------------------------------------------------------

/// Catalog writes: anonymous gets 401, a plain user 403, an admin 201.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_category_write_permissions(pool: PgPool) {
    let plain = create_test_user(&pool, "plain", "user").await;
    let admin = create_test_user(&pool, "boss", "admin").await;
    let body = serde_json::json!({ "name": "Films", "slug": "films" });

    let response = post_json(build_test_app(pool.clone()), "/api/v1/categories", body.clone()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/categories",
        &token_for(&plain),
        body.clone(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/categories",
        &token_for(&admin),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["slug"], "films");
}

/// Category lists are public and searchable.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_category_list_is_public(pool: PgPool) {
    let admin = create_test_user(&pool, "boss", "admin").await;
    seed_catalog(&pool, &token_for(&admin)).await;

    let response = get(build_test_app(pool), "/api/v1/categories").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json[0]["name"], "Films");
}

/// A duplicate slug conflicts with the offending field named.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_genre_slug_conflicts(pool: PgPool) {
    let admin = create_test_user(&pool, "boss", "admin").await;
    let token = token_for(&admin);
    let body = serde_json::json!({ "name": "Drama", "slug": "drama" });

    let response =
        post_json_auth(build_test_app(pool.clone()), "/api/v1/genres", &token, body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_auth(build_test_app(pool), "/api/v1/genres", &token, body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["field"], "slug");
}

/// A malformed slug fails validation.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_bad_slug_rejected(pool: PgPool) {
    let admin = create_test_user(&pool, "boss", "admin").await;

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/genres",
        &token_for(&admin),
        serde_json::json!({ "name": "Bad", "slug": "no spaces allowed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["field"], "slug");
}

/// Deleting a category is admin-only and 404s on unknown slugs.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_category_delete(pool: PgPool) {
    let admin = create_test_user(&pool, "boss", "admin").await;
    let token = token_for(&admin);
    seed_catalog(&pool, &token).await;

    let response = delete_anon(build_test_app(pool.clone()), "/api/v1/categories/films").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response =
        delete_auth(build_test_app(pool.clone()), "/api/v1/categories/films", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(build_test_app(pool), "/api/v1/categories/films", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Titles
// ---------------------------------------------------------------------------

/// A title created with slugs comes back with its category, genres, and a
/// null rating.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_title_create_with_slugs(pool: PgPool) {
    let admin = create_test_user(&pool, "boss", "admin").await;
    let token = token_for(&admin);
    seed_catalog(&pool, &token).await;

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/titles",
        &token,
        serde_json::json!({
            "name": "The Long Year",
            "year": 2001,
            "category": "films",
            "genres": ["drama", "comedy"]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["category"]["slug"], "films");
    assert_eq!(json["genres"].as_array().map(|a| a.len()), Some(2));
    assert!(json["rating"].is_null(), "unreviewed title has no rating");
}

/// The current year is accepted; the next year is not.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_title_year_bound(pool: PgPool) {
    let admin = create_test_user(&pool, "boss", "admin").await;
    let token = token_for(&admin);
    seed_catalog(&pool, &token).await;
    let current_year = Utc::now().year();

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/titles",
        &token,
        serde_json::json!({
            "name": "From The Future",
            "year": current_year + 1,
            "category": "films"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["field"], "year");

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/titles",
        &token,
        serde_json::json!({
            "name": "Of This Year",
            "year": current_year,
            "category": "films"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// An unknown genre slug fails validation naming the field.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_title_unknown_genre_slug_rejected(pool: PgPool) {
    let admin = create_test_user(&pool, "boss", "admin").await;
    let token = token_for(&admin);
    seed_catalog(&pool, &token).await;

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/titles",
        &token,
        serde_json::json!({
            "name": "Mislabeled",
            "year": 2001,
            "category": "films",
            "genres": ["western"]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["field"], "genres");
}

/// Title lists are public and filter by genre slug.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_title_list_filters_by_genre(pool: PgPool) {
    let admin = create_test_user(&pool, "boss", "admin").await;
    let token = token_for(&admin);
    seed_catalog(&pool, &token).await;

    for (name, genre) in [("Alpha", "drama"), ("Beta", "comedy")] {
        let response = post_json_auth(
            build_test_app(pool.clone()),
            "/api/v1/titles",
            &token,
            serde_json::json!({
                "name": name,
                "year": 1990,
                "category": "films",
                "genres": [genre]
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(build_test_app(pool), "/api/v1/titles?genre=drama").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Alpha"]);
}

/// Deleting the category leaves the title readable with a null category.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_category_delete_nulls_title_category(pool: PgPool) {
    let admin = create_test_user(&pool, "boss", "admin").await;
    let token = token_for(&admin);
    seed_catalog(&pool, &token).await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/titles",
        &token,
        serde_json::json!({ "name": "Orphaned", "year": 2001, "category": "films" }),
    )
    .await;
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();

    delete_auth(build_test_app(pool.clone()), "/api/v1/categories/films", &token).await;

    let response = get(build_test_app(pool), &format!("/api/v1/titles/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["category"].is_null());
}
