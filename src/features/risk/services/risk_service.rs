use std::sync::Arc;

use crate::core::clock::Clock;
use crate::core::config::RiskConfig;
use crate::features::risk::dtos::ReturnLevelDto;
use crate::features::risk::models::{RiskAssessment, RiskInput};
use crate::features::risk::services::{
    probability_within, GumbelModel, LinearFallbackModel, NeuralNetworkModel, RiskModel,
    RiskModelError,
};

/// Runs both risk strategies for a location
pub struct RiskService {
    primary: Arc<dyn RiskModel>,
    gumbel: Arc<GumbelModel>,
    clock: Arc<dyn Clock>,
}

impl RiskService {
    pub fn new(
        primary: Arc<dyn RiskModel>,
        gumbel: Arc<GumbelModel>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            primary,
            gumbel,
            clock,
        }
    }

    /// Build from configuration.
    ///
    /// The network falls back to [`LinearFallbackModel`] when no weights are
    /// configured or they fail to load. A Gumbel fit failure is fatal.
    pub fn from_config(
        config: &RiskConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, RiskModelError> {
        let primary: Arc<dyn RiskModel> = match &config.ann_weights_path {
            Some(path) => match NeuralNetworkModel::load(path) {
                Ok(model) => {
                    tracing::info!("Loaded network weights from {}", path.display());
                    Arc::new(model)
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to load network weights from {}: {}. Using linear fallback.",
                        path.display(),
                        e
                    );
                    Arc::new(LinearFallbackModel)
                }
            },
            None => {
                tracing::info!("No network weights configured, using linear fallback");
                Arc::new(LinearFallbackModel)
            }
        };

        let gumbel =
            GumbelModel::from_maxima(&config.rainfall_maxima, &config.water_level_maxima)?;

        Ok(Self::new(primary, Arc::new(gumbel), clock))
    }

    pub fn primary_model_name(&self) -> &'static str {
        self.primary.name()
    }

    /// Evaluate the network (or its fallback) and the Gumbel model, in that order
    pub fn assess(&self, location: &str, input: &RiskInput) -> Vec<RiskAssessment> {
        let timestamp = self.clock.now();

        [self.primary.as_ref(), self.gumbel.as_ref() as &dyn RiskModel]
            .into_iter()
            .map(|model| {
                RiskAssessment::new(
                    timestamp,
                    location,
                    input,
                    model.evaluate(input),
                    model.name(),
                )
            })
            .collect()
    }

    /// Return levels for each period (years, each in (1, 10 000])
    pub fn return_levels(&self, periods: &[f64]) -> Result<Vec<ReturnLevelDto>, RiskModelError> {
        periods
            .iter()
            .map(|&period| {
                Ok(ReturnLevelDto {
                    period_years: period,
                    rainfall_mm: self.gumbel.rainfall().return_level(period)?,
                    water_level: self.gumbel.water_level().return_level(period)?,
                    annual_exceedance_probability: 1.0 / period,
                    probability_within_period: probability_within(period, period.round() as u32)?,
                })
            })
            .collect()
    }
}
