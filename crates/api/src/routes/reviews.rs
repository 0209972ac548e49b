//! Route definitions for reviews and their comments, nested under titles.

use axum::routing::get;
use axum::Router;

use crate::handlers::{comments, reviews};
use crate::state::AppState;

/// Review and comment routes, merged into the `/titles` router.
///
/// ```text
/// GET    /{title_id}/reviews                              -> list_reviews (public)
/// POST   /{title_id}/reviews                              -> create_review (authenticated)
/// GET    /{title_id}/reviews/{review_id}                  -> get_review (public)
/// PATCH  /{title_id}/reviews/{review_id}                  -> update_review (author|moderator|admin)
/// DELETE /{title_id}/reviews/{review_id}                  -> delete_review (author|moderator|admin)
/// GET    /{title_id}/reviews/{review_id}/comments         -> list_comments (public)
/// POST   /{title_id}/reviews/{review_id}/comments         -> create_comment (authenticated)
/// GET    .../comments/{comment_id}                        -> get_comment (public)
/// PATCH  .../comments/{comment_id}                        -> update_comment (author|moderator|admin)
/// DELETE .../comments/{comment_id}                        -> delete_comment (author|moderator|admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{title_id}/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/{title_id}/reviews/{review_id}",
            get(reviews::get_review)
                .patch(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route(
            "/{title_id}/reviews/{review_id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/{title_id}/reviews/{review_id}/comments/{comment_id}",
            get(comments::get_comment)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        )
}
