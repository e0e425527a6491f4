use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::risk::models::{RiskAssessment, RiskInput, RiskInputError, RiskStatus};

/// Request DTO for evaluating a reading with both models
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EvaluateRiskDto {
    #[validate(length(min = 1, max = 200, message = "Lokasi maksimal 200 karakter"))]
    pub location: Option<String>,
    /// Daily rainfall (mm)
    pub rainfall_mm: f64,
    /// Water level (site datum)
    pub water_level: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// Minimum temperature (°C)
    pub temp_min: f64,
    /// Maximum temperature (°C)
    pub temp_max: f64,
}

impl EvaluateRiskDto {
    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or("Manual")
    }

    pub fn to_input(&self) -> Result<RiskInput, RiskInputError> {
        RiskInput::new(
            self.rainfall_mm,
            self.water_level,
            self.humidity,
            self.temp_min,
            self.temp_max,
        )
    }
}

/// Response DTO for a risk evaluation
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RiskEvaluationDto {
    /// One assessment per model, network first
    pub assessments: Vec<RiskAssessment>,
    /// Most severe status across models
    pub overall_status: RiskStatus,
    pub recommendations: Vec<String>,
}

impl RiskEvaluationDto {
    pub fn from_assessments(assessments: Vec<RiskAssessment>) -> Self {
        let overall_status = assessments
            .iter()
            .map(|a| a.status)
            .max()
            .unwrap_or(RiskStatus::Rendah);

        Self {
            assessments,
            overall_status,
            recommendations: overall_status
                .recommendations()
                .iter()
                .map(|r| r.to_string())
                .collect(),
        }
    }
}

/// Query parameters for return levels
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ReturnLevelsQuery {
    /// Comma-separated return periods in years (each > 1). Default: 2,5,10,25,50,100
    pub periods: Option<String>,
}

/// Gumbel return level for one period
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReturnLevelDto {
    pub period_years: f64,
    /// Rainfall expected to be exceeded once per period (mm)
    pub rainfall_mm: f64,
    /// Water level expected to be exceeded once per period
    pub water_level: f64,
    /// 1 / T
    pub annual_exceedance_probability: f64,
    /// Chance of at least one such event within T years
    pub probability_within_period: f64,
}
