pub mod categories;
pub mod comments;
pub mod endpoints;
pub mod error;
pub mod reviews;
pub mod state;
pub mod users;

use axum::{
    Router,
    routing::{delete, get},
};

pub use error::ApiError;
pub use state::{AppState, AppStateInner};

/// Builds the full `/api` route table over an injected database handle.
///
/// Anything unmatched, including a known path with the wrong method, gets a
/// 404 `{"msg": "Endpoint not found."}`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(endpoints::describe_endpoints))
        .route("/api/categories", get(categories::list_categories))
        .route("/api/reviews", get(reviews::list_reviews))
        .route(
            "/api/reviews/{review_id}",
            get(reviews::get_review).patch(reviews::patch_review),
        )
        .route(
            "/api/reviews/{review_id}/comments",
            get(comments::list_review_comments).post(comments::post_review_comment),
        )
        .route("/api/comments/{comment_id}", delete(comments::delete_comment))
        .route("/api/users", get(users::list_users))
        .fallback(endpoints::not_found)
        .method_not_allowed_fallback(endpoints::not_found)
        .with_state(state)
}
