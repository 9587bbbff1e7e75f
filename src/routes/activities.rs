//! Activities route: active chats projected as tasks.

use axum::{extract::State, Json};
use chrono::Utc;

use crate::errors::{ApiResponse, AppError};
use crate::services::activities::{self, ActivitiesData};
use crate::AppState;

/// GET /api/activities: task projections and status counts.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ActivitiesData>>, AppError> {
    let data = activities::get_activities(&state.db, Utc::now()).await?;
    Ok(ApiResponse::success(data))
}
