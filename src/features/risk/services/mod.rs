mod gumbel;
mod linear_fallback;
mod neural_network;
mod risk_service;

use thiserror::Error;

use crate::features::risk::models::{clamp_risk, RiskEstimate, RiskInput, RiskStatus};

pub use gumbel::{
    probability_within, GumbelDistribution, GumbelModel, MAX_RETURN_PERIOD_YEARS,
};
pub use linear_fallback::LinearFallbackModel;
pub use neural_network::{
    Activation, DenseLayer, InputRange, NetworkWeights, NeuralNetworkModel, DEFAULT_INPUT_RANGES,
};
pub use risk_service::RiskService;

#[derive(Debug, Error)]
pub enum RiskModelError {
    #[error("Failed to read network weights: {0}")]
    WeightsIo(#[from] std::io::Error),

    #[error("Failed to parse network weights: {0}")]
    WeightsFormat(#[from] serde_json::Error),

    #[error("Invalid network shape: {0}")]
    Shape(String),

    #[error("Cannot fit distribution: {0}")]
    Fit(String),

    #[error("Invalid parameter: {0}")]
    Parameter(String),
}

/// A flood risk strategy.
///
/// Implementations must be pure: the same input always yields the same level,
/// with no I/O and no hidden state. `evaluate` clamps and classifies, so every
/// strategy shares one output contract.
pub trait RiskModel: Send + Sync {
    /// Stable identifier reported with each assessment
    fn name(&self) -> &'static str;

    /// Unclamped risk scalar
    fn raw_risk(&self, input: &RiskInput) -> f64;

    /// Optional model-specific explanation
    fn detail(&self, _input: &RiskInput) -> Option<String> {
        None
    }

    fn evaluate(&self, input: &RiskInput) -> RiskEstimate {
        let risk_level = clamp_risk(self.raw_risk(input));
        let status = RiskStatus::from_level(risk_level);

        RiskEstimate {
            risk_level,
            status,
            message: status.message().to_string(),
            detail: self.detail(input),
        }
    }
}
