use crate::features::risk::models::RiskInput;
use crate::features::risk::services::RiskModel;

/// Weighted linear combination used when trained network weights are unavailable:
///
/// `risk = 0.5*rain/300 + 0.3*water/150 + 0.15*humidity/100 + 0.05*(temp_avg-20)/20`
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearFallbackModel;

impl LinearFallbackModel {
    pub const NAME: &'static str = "linear_fallback";

    const RAINFALL_WEIGHT: f64 = 0.5;
    const RAINFALL_SCALE: f64 = 300.0;
    const WATER_WEIGHT: f64 = 0.3;
    const WATER_SCALE: f64 = 150.0;
    const HUMIDITY_WEIGHT: f64 = 0.15;
    const HUMIDITY_SCALE: f64 = 100.0;
    const TEMP_WEIGHT: f64 = 0.05;
    const TEMP_BASELINE: f64 = 20.0;
    const TEMP_SCALE: f64 = 20.0;
}

impl RiskModel for LinearFallbackModel {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn raw_risk(&self, input: &RiskInput) -> f64 {
        Self::RAINFALL_WEIGHT * input.rainfall_mm / Self::RAINFALL_SCALE
            + Self::WATER_WEIGHT * input.water_level / Self::WATER_SCALE
            + Self::HUMIDITY_WEIGHT * input.humidity_pct / Self::HUMIDITY_SCALE
            + Self::TEMP_WEIGHT * (input.temp_avg() - Self::TEMP_BASELINE) / Self::TEMP_SCALE
    }
}
