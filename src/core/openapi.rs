use utoipa::{Modify, OpenApi};

use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::flood_reports::{
    dtos as flood_reports_dtos, handlers as flood_reports_handlers, models as flood_reports_models,
};
use crate::features::rate_limits::{dtos as rate_limits_dtos, handlers as rate_limits_handlers};
use crate::features::risk::{dtos as risk_dtos, handlers as risk_handlers, models as risk_models};
use crate::features::statistics::{dtos as statistics_dtos, handlers as statistics_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports
        flood_reports_handlers::submit_report,
        flood_reports_handlers::list_reports,
        flood_reports_handlers::list_severities,
        rate_limits_handlers::get_quota_status,
        // Statistics
        statistics_handlers::get_monthly_statistics,
        statistics_handlers::get_summary,
        // Dashboard
        dashboard_handlers::get_dashboard,
        // Risk
        risk_handlers::evaluate_risk,
        risk_handlers::get_return_levels,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Reports
            flood_reports_models::FloodDepth,
            flood_reports_models::ReportStatus,
            flood_reports_models::MonthlyStatistics,
            flood_reports_dtos::SubmitReportForm,
            flood_reports_dtos::FloodReportResponseDto,
            flood_reports_dtos::ReportWindow,
            flood_reports_dtos::SeverityOptionDto,
            ApiResponse<flood_reports_dtos::FloodReportResponseDto>,
            ApiResponse<Vec<flood_reports_dtos::FloodReportResponseDto>>,
            ApiResponse<Vec<flood_reports_dtos::SeverityOptionDto>>,
            rate_limits_dtos::QuotaStatusDto,
            ApiResponse<rate_limits_dtos::QuotaStatusDto>,
            // Statistics
            statistics_dtos::DailyCountDto,
            statistics_dtos::MonthlyCountDto,
            statistics_dtos::SeverityCountDto,
            statistics_dtos::StatisticsSummaryDto,
            ApiResponse<flood_reports_models::MonthlyStatistics>,
            ApiResponse<statistics_dtos::StatisticsSummaryDto>,
            // Dashboard
            dashboard_dtos::LocationRiskDto,
            dashboard_dtos::DashboardDto,
            ApiResponse<dashboard_dtos::DashboardDto>,
            // Risk
            risk_models::RiskStatus,
            risk_models::RiskAssessment,
            risk_dtos::EvaluateRiskDto,
            risk_dtos::RiskEvaluationDto,
            risk_dtos::ReturnLevelDto,
            ApiResponse<risk_dtos::RiskEvaluationDto>,
            ApiResponse<Vec<risk_dtos::ReturnLevelDto>>,
        )
    ),
    tags(
        (name = "Reports", description = "Flood report submission and listing (public)"),
        (name = "Statistics", description = "Aggregates over submitted reports"),
        (name = "Dashboard", description = "Realtime flood risk per monitored location"),
        (name = "Risk", description = "Neural network and Gumbel risk models"),
    ),
    info(
        title = "Siaga Banjir API",
        version = "0.1.0",
        description = "Community flood reporting and early warning",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
