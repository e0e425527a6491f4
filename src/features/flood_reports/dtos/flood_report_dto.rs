use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::flood_reports::models::{FloodDepth, FloodReport, ReportStatus};

/// Submit report form for OpenAPI documentation.
/// The handler reads the multipart body directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitReportForm {
    #[schema(example = "Jl. Contoh No.1, Kampung Melayu")]
    pub address: String,
    /// Depth label or code, e.g. "Setinggi lutut" or "lutut"
    #[schema(example = "Setinggi lutut")]
    pub severity: String,
    #[schema(example = "Budi")]
    pub reporter_name: String,
    #[schema(example = "0812-3456-7890")]
    pub reporter_contact: Option<String>,
    /// JPG, JPEG, PNG or GIF
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photo: Option<String>,
}

/// Public view of a report. The submitter identity is never exposed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FloodReportResponseDto {
    pub id: i64,
    /// WIB timestamp
    pub submitted_at: DateTime<FixedOffset>,
    pub address: String,
    pub severity: FloodDepth,
    pub severity_label: String,
    pub reporter_name: String,
    pub photo_reference: Option<String>,
    pub status: ReportStatus,
}

impl From<FloodReport> for FloodReportResponseDto {
    fn from(report: FloodReport) -> Self {
        Self {
            id: report.id,
            submitted_at: report.submitted_at,
            address: report.address,
            severity: report.severity,
            severity_label: report.severity.label().to_string(),
            reporter_name: report.reporter_name,
            photo_reference: report.photo_reference,
            status: report.status,
        }
    }
}

/// Which reports to list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportWindow {
    #[default]
    Today,
    Month,
    All,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListReportsQuery {
    /// today (default), month or all
    pub window: Option<ReportWindow>,
}

/// Selectable flood depth
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SeverityOptionDto {
    pub code: FloodDepth,
    pub label: String,
}

impl From<FloodDepth> for SeverityOptionDto {
    fn from(depth: FloodDepth) -> Self {
        Self {
            code: depth,
            label: depth.label().to_string(),
        }
    }
}
