use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use serde_json::Value;
use tracing::info;

use tabletop_db::ReviewQuery;
use tabletop_types::api::{ListReviewsQuery, ReviewResponse, ReviewsResponse, VoteUpdate};

use crate::error::{ApiError, parse_id};
use crate::state::{AppState, run_db};

const INC_VOTES: &str = "inc_votes";

/// GET /api/reviews?sort_by=&order=&category=
pub async fn list_reviews(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListReviewsQuery>, ApiError>,
) -> Result<Json<ReviewsResponse>, ApiError> {
    // Validation happens here, before any query runs. An empty category
    // means no filter.
    let query = ReviewQuery::new(
        params.sort_by.as_deref(),
        params.order.as_deref(),
        params.category.filter(|c| !c.is_empty()),
    )?;

    let rows = run_db(&state, move |db| db.list_reviews(&query)).await?;
    Ok(Json(ReviewsResponse {
        reviews: rows.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/reviews/{review_id}
pub async fn get_review(
    State(state): State<AppState>,
    WithRejection(Path(review_id), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let review_id = parse_id(&review_id)?;
    let row = run_db(&state, move |db| db.get_review(review_id)).await?;
    Ok(Json(ReviewResponse { review: row.into() }))
}

/// PATCH /api/reviews/{review_id} with `{"inc_votes": n}`
pub async fn patch_review(
    State(state): State<AppState>,
    WithRejection(Path(review_id), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, ApiError>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let review_id = parse_id(&review_id)?;
    let update = parse_vote_update(&body)?;

    let row = run_db(&state, move |db| {
        db.increment_review_votes(review_id, update.inc_votes)
    })
    .await?;

    info!(
        "Review {} votes changed by {} (now {})",
        review_id, update.inc_votes, row.votes
    );
    Ok(Json(ReviewResponse { review: row.into() }))
}

/// Accepts exactly one field, `inc_votes`, holding an integer.
///
/// The first unrecognised key, in the order the client sent them, is named in
/// the error.
fn parse_vote_update(body: &Value) -> Result<VoteUpdate, ApiError> {
    let fields = body.as_object().ok_or(ApiError::InvalidRequest)?;

    if let Some(key) = fields.keys().find(|k| k.as_str() != INC_VOTES) {
        return Err(ApiError::BadRequest(format!(
            "{} is an invalid request property",
            key
        )));
    }

    let inc_votes = fields
        .get(INC_VOTES)
        .and_then(Value::as_i64)
        .ok_or(ApiError::InvalidRequest)?;

    Ok(VoteUpdate { inc_votes })
}
