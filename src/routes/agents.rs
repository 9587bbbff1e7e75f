//! Agents route: per-agent usage and totals.

use axum::{extract::State, Json};
use chrono::Utc;

use crate::errors::{ApiResponse, AppError};
use crate::services::agents::{self, AgentsData};
use crate::AppState;

/// GET /api/agents: every agent with chat counts, recency and category.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AgentsData>>, AppError> {
    let data = agents::get_agents(&state.db, Utc::now()).await?;
    Ok(ApiResponse::success(data))
}
