use axum::{Json, extract::State};

use tabletop_types::api::UsersResponse;

use crate::error::ApiError;
use crate::state::{AppState, run_db};

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    let rows = run_db(&state, |db| db.list_users()).await?;
    Ok(Json(UsersResponse {
        users: rows.into_iter().map(Into::into).collect(),
    }))
}
