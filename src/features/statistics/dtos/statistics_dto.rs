use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::flood_reports::dtos::ReportWindow;
use crate::features::flood_reports::models::FloodDepth;

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SummaryQuery {
    /// today, month (default) or all
    pub window: Option<ReportWindow>,
}

/// Reports on one WIB calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyCountDto {
    pub date: NaiveDate,
    pub count: i64,
}

/// Reports in one WIB calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyCountDto {
    /// `YYYY-MM`
    pub month: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SeverityCountDto {
    pub severity: FloodDepth,
    pub label: String,
    pub count: i64,
}

/// Aggregates over the reports in a window
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatisticsSummaryDto {
    pub window: ReportWindow,
    pub total: i64,
    /// Oldest day first, days without reports omitted
    pub by_day: Vec<DailyCountDto>,
    /// Oldest month first
    pub by_month: Vec<MonthlyCountDto>,
    /// Every depth, shallowest first, zero counts included
    pub by_severity: Vec<SeverityCountDto>,
    pub most_common_severity: Option<FloodDepth>,
    pub most_affected_address: Option<String>,
    /// Distinct submitter identities
    pub unique_submitters: i64,
}
