use std::sync::LazyLock;

use axum::Json;
use serde_json::Value;
use tracing::error;

use crate::error::ApiError;

static ENDPOINTS: LazyLock<serde_json::Result<Value>> =
    LazyLock::new(|| serde_json::from_str(include_str!("endpoints.json")));

/// GET /api — describes every endpoint this service exposes.
pub async fn describe_endpoints() -> Result<Json<Value>, ApiError> {
    match &*ENDPOINTS {
        Ok(doc) => Ok(Json(doc.clone())),
        Err(e) => {
            error!("endpoints.json is not valid JSON: {}", e);
            Err(ApiError::Internal)
        }
    }
}

/// Fallback for every unmatched method or path.
pub async fn not_found() -> ApiError {
    ApiError::EndpointNotFound
}
