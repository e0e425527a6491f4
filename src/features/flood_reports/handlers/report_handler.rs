use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::extractor::SubmitterIdentity;
use crate::features::flood_reports::dtos::*;
use crate::features::flood_reports::models::FloodDepth;
use crate::features::flood_reports::services::{ReportService, SubmissionService, SubmitReport};
use crate::features::photos::PhotoUpload;
use crate::shared::types::ApiResponse;

async fn read_text(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read {} field: {}", name, e)))
}

/// Collect the multipart form into a submission. Missing text fields are
/// left empty so validation reports all of them at once.
async fn read_submission(mut multipart: Multipart) -> Result<SubmitReport> {
    let mut request = SubmitReport {
        address: String::new(),
        severity: String::new(),
        reporter_name: String::new(),
        reporter_contact: None,
        photo: None,
    };

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "address" => request.address = read_text(field, "address").await?,
            "severity" => request.severity = read_text(field, "severity").await?,
            "reporter_name" => request.reporter_name = read_text(field, "reporter_name").await?,
            "reporter_contact" => {
                request.reporter_contact = Some(read_text(field, "reporter_contact").await?)
            }
            "photo" => {
                let original_name = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read photo bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read photo data: {}", e))
                })?;

                // Browsers send an empty part when no file is chosen
                if !original_name.is_empty() || !data.is_empty() {
                    request.photo = Some(PhotoUpload {
                        original_name,
                        data: data.to_vec(),
                    });
                }
            }
            _ => debug!("Ignoring unknown field: {}", field_name),
        }
    }

    Ok(request)
}

/// Submit a flood report
///
/// Accepts multipart/form-data. At most the configured number of reports per
/// submitter per WIB day are accepted.
#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "Reports",
    request_body(
        content = SubmitReportForm,
        content_type = "multipart/form-data",
        description = "Flood report form with optional photo",
    ),
    responses(
        (status = 201, description = "Report stored", body = ApiResponse<FloodReportResponseDto>),
        (status = 400, description = "Invalid report"),
        (status = 413, description = "Photo too large"),
        (status = 415, description = "Unsupported photo type"),
        (status = 429, description = "Daily report limit reached"),
        (status = 500, description = "Report could not be stored"),
        (status = 503, description = "Photo storage unavailable")
    )
)]
pub async fn submit_report(
    State(service): State<Arc<SubmissionService>>,
    identity: SubmitterIdentity,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FloodReportResponseDto>>)> {
    let request = read_submission(multipart).await?;
    let outcome = service.submit(identity.as_str(), request).await?;
    let message = outcome.message().to_string();

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(FloodReportResponseDto::from(outcome.report)),
            Some(message),
            None,
        )),
    ))
}

/// List flood reports, newest first
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Reports",
    params(ListReportsQuery),
    responses(
        (status = 200, description = "Reports in the window", body = ApiResponse<Vec<FloodReportResponseDto>>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_reports(
    State(service): State<Arc<ReportService>>,
    Query(query): Query<ListReportsQuery>,
) -> Result<Json<ApiResponse<Vec<FloodReportResponseDto>>>> {
    let reports = service.list(query.window.unwrap_or_default()).await?;

    Ok(Json(ApiResponse::listed(
        reports
            .into_iter()
            .map(FloodReportResponseDto::from)
            .collect(),
    )))
}

/// Flood depth choices for the report form, shallowest first
#[utoipa::path(
    get,
    path = "/api/reports/severities",
    tag = "Reports",
    responses(
        (status = 200, description = "Flood depth options", body = ApiResponse<Vec<SeverityOptionDto>>)
    )
)]
pub async fn list_severities() -> Json<ApiResponse<Vec<SeverityOptionDto>>> {
    let options = FloodDepth::ALL.into_iter().map(SeverityOptionDto::from).collect();
    Json(ApiResponse::success(Some(options), None, None))
}
