use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::SubmitterIdentity;
use crate::features::rate_limits::dtos::QuotaStatusDto;
use crate::features::rate_limits::services::QuotaService;
use crate::shared::types::ApiResponse;

/// Get the caller's daily report quota
#[utoipa::path(
    get,
    path = "/api/reports/quota",
    tag = "Reports",
    responses(
        (status = 200, description = "Quota status", body = ApiResponse<QuotaStatusDto>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_quota_status(
    State(service): State<Arc<QuotaService>>,
    identity: SubmitterIdentity,
) -> Result<Json<ApiResponse<QuotaStatusDto>>> {
    let status = service.status(identity.as_str()).await?;
    Ok(Json(ApiResponse::success(Some(status), None, None)))
}
