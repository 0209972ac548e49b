//! Route definitions for titles, with nested review and comment routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::titles;
use crate::routes::reviews;
use crate::state::AppState;

/// Title routes mounted at `/titles`. Review and comment routes nest under
/// `/{title_id}/reviews`.
///
/// ```text
/// GET    /      -> list_titles (public)
/// POST   /      -> create_title (admin)
/// GET    /{id}  -> get_title (public)
/// PATCH  /{id}  -> update_title (admin)
/// DELETE /{id}  -> delete_title (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(titles::list_titles).post(titles::create_title))
        .route(
            "/{id}",
            get(titles::get_title)
                .patch(titles::update_title)
                .delete(titles::delete_title),
        )
        .merge(reviews::router())
}
