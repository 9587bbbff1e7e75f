//! Analytics route: synthesized reports filtered by type.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;

use crate::errors::{ApiResponse, AppError};
use crate::routes::ApiQuery;
use crate::services::analytics::{self, AnalyticsData, ReportType};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(rename = "type")]
    pub report_type: Option<String>,
}

impl AnalyticsQuery {
    pub fn report_type(&self) -> Result<ReportType, AppError> {
        match self.report_type.as_deref() {
            None | Some("") => Ok(ReportType::All),
            Some(value) => value.parse(),
        }
    }
}

/// GET /api/analytics?type=: reports for the selected type (default `all`).
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AnalyticsQuery>,
) -> Result<Json<ApiResponse<AnalyticsData>>, AppError> {
    let report_type = query.report_type()?;
    let data = analytics::get_reports(&state.db, report_type, Utc::now()).await?;
    Ok(ApiResponse::success(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_type_selects_all() {
        let query = AnalyticsQuery::default();
        assert_eq!(query.report_type().unwrap(), ReportType::All);
    }

    #[test]
    fn explicit_type_is_parsed() {
        let query = AnalyticsQuery {
            report_type: Some("satisfaction".to_string()),
        };
        assert_eq!(query.report_type().unwrap(), ReportType::Satisfaction);

        let bad = AnalyticsQuery {
            report_type: Some("revenue".to_string()),
        };
        assert!(bad.report_type().is_err());
    }
}
