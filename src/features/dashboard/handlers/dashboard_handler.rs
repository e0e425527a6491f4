use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::dashboard::dtos::*;
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::ApiResponse;

/// Realtime flood risk for every monitored location
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Combined risk view", body = ApiResponse<DashboardDto>),
        (status = 503, description = "Readings feed unavailable")
    )
)]
pub async fn get_dashboard(
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<DashboardDto>>> {
    let dashboard = service.dashboard().await?;
    Ok(Json(ApiResponse::success(Some(dashboard), None, None)))
}
