use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::core::config::parse_f64_list;
use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::risk::dtos::*;
use crate::features::risk::services::RiskService;
use crate::shared::types::ApiResponse;

const DEFAULT_RETURN_PERIODS: &[f64] = &[2.0, 5.0, 10.0, 25.0, 50.0, 100.0];

/// Evaluate a reading with the network and Gumbel models
#[utoipa::path(
    post,
    path = "/api/risk/evaluate",
    tag = "Risk",
    request_body = EvaluateRiskDto,
    responses(
        (status = 200, description = "Risk assessments", body = ApiResponse<RiskEvaluationDto>),
        (status = 400, description = "Invalid reading")
    )
)]
pub async fn evaluate_risk(
    State(service): State<Arc<RiskService>>,
    AppJson(dto): AppJson<EvaluateRiskDto>,
) -> Result<Json<ApiResponse<RiskEvaluationDto>>> {
    dto.validate()?;
    let input = dto
        .to_input()
        .map_err(|e| AppError::Validation(e.fields))?;

    let assessments = service.assess(dto.location(), &input);
    Ok(Json(ApiResponse::success(
        Some(RiskEvaluationDto::from_assessments(assessments)),
        None,
        None,
    )))
}

/// Gumbel return levels for rainfall and water level
#[utoipa::path(
    get,
    path = "/api/risk/return-levels",
    tag = "Risk",
    params(ReturnLevelsQuery),
    responses(
        (status = 200, description = "Return levels", body = ApiResponse<Vec<ReturnLevelDto>>),
        (status = 400, description = "Invalid return period")
    )
)]
pub async fn get_return_levels(
    State(service): State<Arc<RiskService>>,
    Query(query): Query<ReturnLevelsQuery>,
) -> Result<Json<ApiResponse<Vec<ReturnLevelDto>>>> {
    let periods = match query.periods.as_deref() {
        Some(raw) => parse_f64_list(raw).map_err(AppError::BadRequest)?,
        None => DEFAULT_RETURN_PERIODS.to_vec(),
    };

    let levels = service
        .return_levels(&periods)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(Json(ApiResponse::success(Some(levels), None, None)))
}
