use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::info;

use tabletop_db::DbError;
use tabletop_types::api::{AddCommentRequest, CommentPostResponse, CommentsResponse};
use tabletop_types::models::Comment;

use crate::error::{ApiError, parse_id};
use crate::state::{AppState, run_db};

/// GET /api/reviews/{review_id}/comments
pub async fn list_review_comments(
    State(state): State<AppState>,
    WithRejection(Path(review_id), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let review_id = parse_id(&review_id)?;
    let comments = fetch_review_comments(&state, review_id).await?;
    Ok(Json(CommentsResponse { comments }))
}

/// Looks up the comments and checks the review exists concurrently. A missing
/// review wins over whatever the comment lookup returned.
async fn fetch_review_comments(state: &AppState, review_id: i64) -> Result<Vec<Comment>, ApiError> {
    let (comments, exists) = tokio::join!(
        run_db(state, move |db| db.list_comments_for_review(review_id)),
        run_db(state, move |db| db.review_exists(review_id)),
    );

    if !exists? {
        return Err(DbError::review_not_found(review_id).into());
    }
    Ok(comments?.into_iter().map(Into::into).collect())
}

/// POST /api/reviews/{review_id}/comments with `{"username", "body"}`
pub async fn post_review_comment(
    State(state): State<AppState>,
    WithRejection(Path(review_id), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<AddCommentRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let review_id = parse_id(&review_id)?;

    // The review must exist before any insert is attempted.
    if !run_db(&state, move |db| db.review_exists(review_id)).await? {
        return Err(DbError::review_not_found(review_id).into());
    }

    let row = run_db(&state, move |db| {
        db.insert_comment(review_id, req.username.as_deref(), req.body.as_deref())
    })
    .await?;

    info!(
        "Comment {} posted on review {} by {}",
        row.comment_id, row.review_id, row.author
    );
    Ok((
        StatusCode::CREATED,
        Json(CommentPostResponse {
            comment_post: row.into(),
        }),
    ))
}

/// DELETE /api/comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    WithRejection(Path(comment_id), _): WithRejection<Path<String>, ApiError>,
) -> Result<StatusCode, ApiError> {
    let comment_id = parse_id(&comment_id)?;
    run_db(&state, move |db| db.delete_comment(comment_id)).await?;

    info!("Comment {} deleted", comment_id);
    Ok(StatusCode::NO_CONTENT)
}
