//! Overview route: platform-wide counts and recent activity.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;

use crate::errors::{ApiResponse, AppError};
use crate::routes::ApiQuery;
use crate::services::overview::{self, OverviewData};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct OverviewQuery {
    /// Include zero-count days in the usage histogram.
    #[serde(default)]
    pub backfill: bool,
}

/// GET /api/overview: overview page statistics.
pub async fn get(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<OverviewQuery>,
) -> Result<Json<ApiResponse<OverviewData>>, AppError> {
    let data = overview::get_overview(&state.db, Utc::now(), query.backfill).await?;
    Ok(ApiResponse::success(data))
}
