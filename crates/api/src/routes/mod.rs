//! Route definitions, one module per resource.

pub mod auth;
pub mod categories;
pub mod genres;
pub mod health;
pub mod reviews;
pub mod titles;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                                      signup (public)
/// /auth/token                                       code exchange (public)
///
/// /users                                            list, create (admin only)
/// /users/me                                         get, patch own profile (any authenticated)
/// /users/{username}                                 get, patch, delete (admin only)
///
/// /categories                                       list (public), create (admin)
/// /categories/{slug}                                delete (admin)
///
/// /genres                                           list (public), create (admin)
/// /genres/{slug}                                    delete (admin)
///
/// /titles                                           list (public), create (admin)
/// /titles/{id}                                      get (public), patch, delete (admin)
/// /titles/{title_id}/reviews                        list (public), create (authenticated)
/// /titles/{title_id}/reviews/{id}                   get (public), patch, delete (author|moderator|admin)
/// /titles/{title_id}/reviews/{id}/comments          list (public), create (authenticated)
/// /titles/{title_id}/reviews/{id}/comments/{id}     get (public), patch, delete (author|moderator|admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/categories", categories::router())
        .nest("/genres", genres::router())
        .nest("/titles", titles::router())
}
