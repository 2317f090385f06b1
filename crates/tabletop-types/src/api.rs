use serde::{Deserialize, Serialize};

use crate::models::{Category, Comment, Review, User};

// -- Requests --

/// Query string accepted by `GET /api/reviews`.
#[derive(Debug, Default, Deserialize)]
pub struct ListReviewsQuery {
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub category: Option<String>,
}

/// Body of `POST /api/reviews/{review_id}/comments`.
///
/// Both fields are optional at the wire level; a missing one reaches the
/// database as NULL and is rejected there.
#[derive(Debug, Default, Deserialize)]
pub struct AddCommentRequest {
    pub username: Option<String>,
    pub body: Option<String>,
}

/// Validated body of `PATCH /api/reviews/{review_id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteUpdate {
    pub inc_votes: i64,
}

// -- Responses --

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewsResponse {
    pub reviews: Vec<Review>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub review: Review,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentPostResponse {
    #[serde(rename = "commentPost")]
    pub comment_post: Comment,
}

/// Every failure response carries exactly one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub msg: String,
}

impl ErrorBody {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}
