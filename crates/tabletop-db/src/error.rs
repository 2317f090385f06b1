use thiserror::Error;

/// Failures surfaced by the data access layer.
///
/// `NotFound` and `BadRequest` are domain rejections that already carry the
/// client-facing message. `Sqlite` keeps the engine error intact so the HTTP
/// layer can classify it by result code.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("database lock poisoned: {0}")]
    LockPoisoned(String),
}

impl DbError {
    pub fn review_not_found(review_id: i64) -> Self {
        Self::NotFound(format!("Review {} does not exist", review_id))
    }

    pub fn comment_not_found(comment_id: i64) -> Self {
        Self::NotFound(format!("Comment ID: {} does not exist", comment_id))
    }

    pub fn category_not_found(slug: &str) -> Self {
        Self::NotFound(format!("Category: {} does not exist", slug))
    }
}
