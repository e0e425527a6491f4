use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use utoipa::ToSchema;

use crate::features::risk::models::{RiskAssessment, RiskStatus};

/// Combined risk view for one monitored location
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocationRiskDto {
    pub location: String,
    pub source: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub last_update: Option<DateTime<FixedOffset>>,
    pub rainfall_mm: f64,
    pub water_level: f64,
    pub humidity: f64,
    /// Water level alone, normalised over the network's training range
    pub water_status: RiskStatus,
    /// Network (or linear fallback) first, then Gumbel
    pub assessments: Vec<RiskAssessment>,
    /// Most severe status across both models
    pub status: RiskStatus,
}

/// Dashboard: every location plus the system-wide banner
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardDto {
    /// Most severe status across all locations
    pub overall_status: RiskStatus,
    pub message: String,
    pub recommendations: Vec<String>,
    #[schema(value_type = String, format = DateTime)]
    pub generated_at: DateTime<FixedOffset>,
    pub locations: Vec<LocationRiskDto>,
}
