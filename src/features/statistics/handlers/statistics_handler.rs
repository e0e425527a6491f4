use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::flood_reports::dtos::ReportWindow;
use crate::features::flood_reports::models::MonthlyStatistics;
use crate::features::statistics::dtos::*;
use crate::features::statistics::services::AggregationService;
use crate::shared::types::ApiResponse;

/// Statistics for the current WIB month
#[utoipa::path(
    get,
    path = "/api/statistics/monthly",
    tag = "Statistics",
    responses(
        (status = 200, description = "Monthly statistics", body = ApiResponse<MonthlyStatistics>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_monthly_statistics(
    State(service): State<Arc<AggregationService>>,
) -> Result<Json<ApiResponse<MonthlyStatistics>>> {
    let stats = service.monthly_statistics().await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}

/// Grouped report counts for a window
#[utoipa::path(
    get,
    path = "/api/statistics/summary",
    tag = "Statistics",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Statistics summary", body = ApiResponse<StatisticsSummaryDto>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_summary(
    State(service): State<Arc<AggregationService>>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<ApiResponse<StatisticsSummaryDto>>> {
    let summary = service
        .summary(query.window.unwrap_or(ReportWindow::Month))
        .await?;
    Ok(Json(ApiResponse::success(Some(summary), None, None)))
}
