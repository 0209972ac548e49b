//! HTTP-level integration tests for user management and the `/users/me`
//! alias.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_test_user, delete_auth, get, get_auth, patch_json_auth,
    post_json_auth, token_for,
};
use sqlx::PgPool;

use critica_db::repositories::UserRepo;

// ---------------------------------------------------------------------------
// Self-service profile
// ---------------------------------------------------------------------------

/// Any authenticated actor can read their own profile.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_returns_own_profile(pool: PgPool) {
    let user = create_test_user(&pool, "plain", "user").await;
    let token = token_for(&user);

    let response = get_auth(build_test_app(pool), "/api/v1/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["username"], "plain");
    assert_eq!(json["role"], "user");
}

/// The `me` alias requires authentication.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_requires_auth(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/users/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A self-update applies profile fields but never the role, whatever the
/// payload claims.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_patch_preserves_role(pool: PgPool) {
    let user = create_test_user(&pool, "plain", "user").await;
    let token = token_for(&user);

    let response = patch_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/users/me",
        &token,
        serde_json::json!({ "bio": "Reviewing since 2019", "role": "admin" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["bio"], "Reviewing since 2019");
    assert_eq!(json["role"], "user", "role must survive a self-update");

    let row = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(row.role, "user");
}

/// The same holds for privileged roles: a moderator stays a moderator.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_patch_preserves_moderator_role(pool: PgPool) {
    let user = create_test_user(&pool, "mod", "moderator").await;
    let token = token_for(&user);

    let response = patch_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/users/me",
        &token,
        serde_json::json!({ "role": "user" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let row = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(row.role, "moderator");
}

/// The reserved username is rejected on profile update too.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_patch_rejects_reserved_username(pool: PgPool) {
    let user = create_test_user(&pool, "plain", "user").await;
    let token = token_for(&user);

    let response = patch_json_auth(
        build_test_app(pool),
        "/api/v1/users/me",
        &token,
        serde_json::json!({ "username": "me" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["field"], "username");
}

// ---------------------------------------------------------------------------
// Admin surface
// ---------------------------------------------------------------------------

/// Listing users requires the admin tier; moderators are not enough.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_list_is_admin_only(pool: PgPool) {
    let plain = create_test_user(&pool, "plain", "user").await;
    let moderator = create_test_user(&pool, "mod", "moderator").await;
    let admin = create_test_user(&pool, "boss", "admin").await;

    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/v1/users",
        &token_for(&plain),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/v1/users",
        &token_for(&moderator),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(build_test_app(pool), "/api/v1/users", &token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().map(|a| a.len()), Some(3));
}

/// An admin can create a user with an explicit role.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_creates_moderator(pool: PgPool) {
    let admin = create_test_user(&pool, "boss", "admin").await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/users",
        &token_for(&admin),
        serde_json::json!({
            "username": "newmod",
            "email": "newmod@x.com",
            "role": "moderator"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let row = UserRepo::find_by_username(&pool, "newmod").await.unwrap().unwrap();
    assert_eq!(row.role, "moderator");
}

/// An unknown role name fails validation.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_create_with_unknown_role_rejected(pool: PgPool) {
    let admin = create_test_user(&pool, "boss", "admin").await;

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/users",
        &token_for(&admin),
        serde_json::json!({
            "username": "odd",
            "email": "odd@x.com",
            "role": "overlord"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["field"], "role");
}

/// Admin PATCH by username can change the role.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_promotes_user(pool: PgPool) {
    let admin = create_test_user(&pool, "boss", "admin").await;
    create_test_user(&pool, "plain", "user").await;

    let response = patch_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/users/plain",
        &token_for(&admin),
        serde_json::json!({ "role": "moderator" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let row = UserRepo::find_by_username(&pool, "plain").await.unwrap().unwrap();
    assert_eq!(row.role, "moderator");
}

/// Admin DELETE removes the user row.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_deletes_user(pool: PgPool) {
    let admin = create_test_user(&pool, "boss", "admin").await;
    create_test_user(&pool, "doomed", "user").await;

    let response = delete_auth(
        build_test_app(pool.clone()),
        "/api/v1/users/doomed",
        &token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(UserRepo::find_by_username(&pool, "doomed")
        .await
        .unwrap()
        .is_none());
}

/// Unknown usernames 404 on the admin surface.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_get_unknown_user_404(pool: PgPool) {
    let admin = create_test_user(&pool, "boss", "admin").await;

    let response = get_auth(
        build_test_app(pool),
        "/api/v1/users/ghost",
        &token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// The superuser flag grants the admin surface regardless of role.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_superuser_flag_grants_admin_surface(pool: PgPool) {
    let mut su = create_test_user(&pool, "root", "user").await;
    sqlx::query("UPDATE users SET is_superuser = TRUE WHERE id = $1")
        .bind(su.id)
        .execute(&pool)
        .await
        .unwrap();
    su.is_superuser = true;

    let response = get_auth(build_test_app(pool), "/api/v1/users", &token_for(&su)).await;
    assert_eq!(response.status(), StatusCode::OK);
}
