use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

use crate::core::clock::wib;
use crate::shared::constants::SEVERITY_PLACEHOLDER;

/// Observed flood depth, ordered from shallowest to deepest.
///
/// Matches the `flood_depth` database enum; declaration order is the
/// severity order in both Rust and Postgres.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Type,
    ToSchema,
)]
#[sqlx(type_name = "flood_depth", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FloodDepth {
    MataKaki,
    Betis,
    Lutut,
    AtasLutut,
}

impl FloodDepth {
    pub const ALL: [FloodDepth; 4] = [
        FloodDepth::MataKaki,
        FloodDepth::Betis,
        FloodDepth::Lutut,
        FloodDepth::AtasLutut,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            FloodDepth::MataKaki => "mata_kaki",
            FloodDepth::Betis => "betis",
            FloodDepth::Lutut => "lutut",
            FloodDepth::AtasLutut => "atas_lutut",
        }
    }

    /// Label shown on the report form
    pub fn label(&self) -> &'static str {
        match self {
            FloodDepth::MataKaki => "Setinggi mata kaki",
            FloodDepth::Betis => "Setinggi betis",
            FloodDepth::Lutut => "Setinggi lutut",
            FloodDepth::AtasLutut => "Lebih dari lutut",
        }
    }
}

impl std::fmt::Display for FloodDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Accepts either the form label or the code, case-insensitively
impl FromStr for FloodDepth {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(SEVERITY_PLACEHOLDER) {
            return Err("Tinggi banjir belum dipilih".to_string());
        }

        Self::ALL
            .into_iter()
            .find(|d| raw.eq_ignore_ascii_case(d.label()) || raw.eq_ignore_ascii_case(d.code()))
            .ok_or_else(|| format!("Tinggi banjir '{}' tidak dikenal", raw))
    }
}

/// Moderation lifecycle. Only `status` changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::Verified => write!(f, "verified"),
            ReportStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Stored flood report, timestamps presented in WIB
#[derive(Debug, Clone, PartialEq)]
pub struct FloodReport {
    pub id: i64,
    pub submitted_at: DateTime<FixedOffset>,
    pub address: String,
    pub severity: FloodDepth,
    pub reporter_name: String,
    pub reporter_contact: Option<String>,
    pub photo_reference: Option<String>,
    pub submitter_identity: String,
    pub status: ReportStatus,
}

/// Database row for `flood_reports`
#[derive(Debug, Clone, FromRow)]
pub(crate) struct FloodReportRow {
    pub id: i64,
    pub submitted_at: DateTime<Utc>,
    pub address: String,
    pub severity: FloodDepth,
    pub reporter_name: String,
    pub reporter_contact: Option<String>,
    pub photo_reference: Option<String>,
    pub submitter_identity: String,
    pub status: ReportStatus,
}

impl From<FloodReportRow> for FloodReport {
    fn from(row: FloodReportRow) -> Self {
        Self {
            id: row.id,
            submitted_at: row.submitted_at.with_timezone(&wib()),
            address: row.address,
            severity: row.severity,
            reporter_name: row.reporter_name,
            reporter_contact: row.reporter_contact,
            photo_reference: row.photo_reference,
            submitter_identity: row.submitter_identity,
            status: row.status,
        }
    }
}

/// Fields for a new report. The store assigns `id`, `submitted_at` and `status`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFloodReport {
    pub address: String,
    pub severity: FloodDepth,
    pub reporter_name: String,
    pub reporter_contact: Option<String>,
    pub photo_reference: Option<String>,
    pub submitter_identity: String,
}
