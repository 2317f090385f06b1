use axum::{Json, extract::State};

use tabletop_types::api::CategoriesResponse;

use crate::error::ApiError;
use crate::state::{AppState, run_db};

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let rows = run_db(&state, |db| db.list_categories()).await?;
    Ok(Json(CategoriesResponse {
        categories: rows.into_iter().map(Into::into).collect(),
    }))
}
