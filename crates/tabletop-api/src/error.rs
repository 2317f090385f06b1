//! Error normalization for every handler.
//!
//! Failures from the data layer and from request extraction funnel into
//! `ApiError`, which decides the status code and the single `msg` string the
//! client sees. Engine errors are classified by SQLite result code; anything
//! unrecognised is logged and reported as a bare 500.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::ffi;
use thiserror::Error;
use tracing::{debug, error};

use tabletop_db::DbError;
use tabletop_types::api::ErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input: bad path id, unparseable body, missing or mistyped
    /// column value.
    #[error("Invalid request")]
    InvalidRequest,

    /// A comment's author does not reference an existing user.
    #[error("Username does not exist")]
    UnknownUsername,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Endpoint not found.")]
    EndpointNotFound,

    #[error("Internal Server Error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UnknownUsername | Self::NotFound(_) | Self::EndpointNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) => Self::NotFound(msg),
            DbError::BadRequest(msg) => Self::BadRequest(msg),
            DbError::Sqlite(e) => classify_sqlite(e),
            other => {
                error!("Database failure: {}", other);
                Self::Internal
            }
        }
    }
}

fn classify_sqlite(err: rusqlite::Error) -> ApiError {
    if let rusqlite::Error::SqliteFailure(ref failure, _) = err {
        match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_NOTNULL | ffi::SQLITE_CONSTRAINT_DATATYPE => {
                debug!("Rejected input: {}", err);
                return ApiError::InvalidRequest;
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                debug!("Foreign key violation: {}", err);
                return ApiError::UnknownUsername;
            }
            _ => {}
        }
        if matches!(
            failure.code,
            rusqlite::ErrorCode::TypeMismatch | rusqlite::ErrorCode::TooBig
        ) {
            debug!("Rejected input: {}", err);
            return ApiError::InvalidRequest;
        }
    }

    error!("Unhandled SQLite error: {}", err);
    ApiError::Internal
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected JSON body: {}", rejection.body_text());
        Self::InvalidRequest
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        debug!("Rejected path: {}", rejection.body_text());
        Self::InvalidRequest
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        debug!("Rejected query string: {}", rejection.body_text());
        Self::InvalidRequest
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

/// Parses a numeric path segment such as `review_id` or `comment_id`.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidRequest)
}
