use std::sync::Arc;

use crate::core::clock::Clock;
use crate::core::config::FeedConfig;
use crate::features::dashboard::clients::{FeedError, Reading, ReadingsSource};
use crate::features::dashboard::dtos::*;
use crate::features::mirror::ReportMirror;
use crate::features::risk::models::{RiskAssessment, RiskInput, RiskStatus};
use crate::features::risk::services::DEFAULT_INPUT_RANGES;
use crate::features::risk::RiskService;

/// Index of water level in the network's input ranges
const WATER_LEVEL_INPUT: usize = 1;

/// Realtime feed adapter: fetches readings and scores every location with
/// both risk models
pub struct DashboardService {
    source: Option<Arc<dyn ReadingsSource>>,
    risk: Arc<RiskService>,
    mirror: Arc<dyn ReportMirror>,
    clock: Arc<dyn Clock>,
    log_assessments: bool,
    default_temp_min: f64,
    default_temp_max: f64,
}

impl DashboardService {
    pub fn new(
        source: Option<Arc<dyn ReadingsSource>>,
        risk: Arc<RiskService>,
        mirror: Arc<dyn ReportMirror>,
        clock: Arc<dyn Clock>,
        feed: &FeedConfig,
    ) -> Self {
        Self {
            source,
            risk,
            mirror,
            clock,
            log_assessments: false,
            default_temp_min: feed.default_temp_min,
            default_temp_max: feed.default_temp_max,
        }
    }

    /// Append every produced assessment to the mirror's prediction log
    pub fn with_assessment_log(mut self, enabled: bool) -> Self {
        self.log_assessments = enabled;
        self
    }

    pub async fn dashboard(&self) -> Result<DashboardDto, FeedError> {
        let source = self.source.as_ref().ok_or(FeedError::NotConfigured)?;
        let readings = source.fetch_current_readings().await?;

        let locations: Vec<LocationRiskDto> = readings
            .into_iter()
            .filter_map(|reading| self.assess_location(reading))
            .collect();

        if locations.is_empty() {
            return Err(FeedError::NoReadings);
        }

        if self.log_assessments {
            let assessments: Vec<RiskAssessment> = locations
                .iter()
                .flat_map(|l| l.assessments.iter().cloned())
                .collect();
            if !self.mirror.append_assessments(&assessments).await {
                tracing::warn!("Failed to log {} assessment(s)", assessments.len());
            }
        }

        let overall_status = locations
            .iter()
            .map(|l| l.status)
            .max()
            .unwrap_or(RiskStatus::Rendah);

        Ok(DashboardDto {
            overall_status,
            message: overall_status.message().to_string(),
            recommendations: overall_status
                .recommendations()
                .iter()
                .map(|r| r.to_string())
                .collect(),
            generated_at: self.clock.now(),
            locations,
        })
    }

    /// `None` for a reading the models cannot take
    fn assess_location(&self, reading: Reading) -> Option<LocationRiskDto> {
        let input = match RiskInput::new(
            reading.rainfall_mm,
            reading.water_level,
            reading.humidity,
            reading.temp_min.unwrap_or(self.default_temp_min),
            reading.temp_max.unwrap_or(self.default_temp_max),
        ) {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!("Skipping reading for {}: {}", reading.location, e);
                return None;
            }
        };

        let assessments = self.risk.assess(&reading.location, &input);
        let status = assessments
            .iter()
            .map(|a| a.status)
            .max()
            .unwrap_or(RiskStatus::Rendah);
        let water_status = RiskStatus::from_level(
            DEFAULT_INPUT_RANGES[WATER_LEVEL_INPUT].normalize(reading.water_level),
        );

        Some(LocationRiskDto {
            location: reading.location,
            source: reading.source,
            last_update: reading.last_update,
            rainfall_mm: reading.rainfall_mm,
            water_level: reading.water_level,
            humidity: reading.humidity,
            water_status,
            assessments,
            status,
        })
    }
}
