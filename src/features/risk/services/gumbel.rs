use std::f64::consts::PI;

use crate::features::risk::models::RiskInput;
use crate::features::risk::services::{RiskModel, RiskModelError};

/// Euler–Mascheroni constant
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Longest return period the model answers for
pub const MAX_RETURN_PERIOD_YEARS: f64 = 10_000.0;

/// Gumbel (type I extreme value) distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GumbelDistribution {
    /// α
    pub location: f64,
    /// β, always > 0
    pub scale: f64,
}

impl GumbelDistribution {
    pub fn new(location: f64, scale: f64) -> Result<Self, RiskModelError> {
        if !location.is_finite() || !scale.is_finite() || scale <= 0.0 {
            return Err(RiskModelError::Parameter(format!(
                "location {} / scale {} is not a valid Gumbel parameterisation",
                location, scale
            )));
        }
        Ok(Self { location, scale })
    }

    /// Method-of-moments fit over a sample of annual maxima.
    ///
    /// β = (√6/π)·s, α = mean − γ·β with `s` the sample (n−1) standard deviation.
    pub fn fit_moments(maxima: &[f64]) -> Result<Self, RiskModelError> {
        if maxima.len() < 2 {
            return Err(RiskModelError::Fit(format!(
                "need at least 2 annual maxima, got {}",
                maxima.len()
            )));
        }
        if maxima.iter().any(|x| !x.is_finite()) {
            return Err(RiskModelError::Fit("annual maxima must be finite".to_string()));
        }

        let n = maxima.len() as f64;
        let mean = maxima.iter().sum::<f64>() / n;
        let variance = maxima.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let std_dev = variance.sqrt();

        if std_dev <= 0.0 {
            return Err(RiskModelError::Fit(
                "annual maxima have zero spread".to_string(),
            ));
        }

        let scale = 6f64.sqrt() / PI * std_dev;
        let location = mean - EULER_GAMMA * scale;
        Self::new(location, scale)
    }

    /// F(x) = exp(−exp(−(x−α)/β))
    pub fn cdf(&self, x: f64) -> f64 {
        (-(-(x - self.location) / self.scale).exp()).exp()
    }

    pub fn exceedance_probability(&self, x: f64) -> f64 {
        1.0 - self.cdf(x)
    }

    /// x_T = α − β·ln(−ln(1 − 1/T)), defined for 1 < T ≤ [`MAX_RETURN_PERIOD_YEARS`]
    pub fn return_level(&self, period_years: f64) -> Result<f64, RiskModelError> {
        if !period_years.is_finite() || period_years <= 1.0 {
            return Err(RiskModelError::Parameter(format!(
                "return period must be greater than 1 year, got {}",
                period_years
            )));
        }
        check_period_bound(period_years)?;
        let p = 1.0 / period_years;
        Ok(self.location - self.scale * (-(1.0 - p).ln()).ln())
    }

    /// T = 1 / (1 − F(x)). Infinite once the exceedance probability underflows.
    pub fn return_period(&self, x: f64) -> f64 {
        let p = self.exceedance_probability(x);
        if p <= 0.0 {
            f64::INFINITY
        } else {
            1.0 / p
        }
    }
}

fn check_period_bound(period_years: f64) -> Result<(), RiskModelError> {
    if period_years > MAX_RETURN_PERIOD_YEARS {
        return Err(RiskModelError::Parameter(format!(
            "return period must be at most {} years, got {}",
            MAX_RETURN_PERIOD_YEARS, period_years
        )));
    }
    Ok(())
}

/// Probability that a `period_years` event happens at least once within `horizon_years`.
///
/// Computed as −expm1(n·ln1p(−1/T)) so long periods keep their precision.
pub fn probability_within(period_years: f64, horizon_years: u32) -> Result<f64, RiskModelError> {
    if !period_years.is_finite() || period_years < 1.0 {
        return Err(RiskModelError::Parameter(format!(
            "return period must be at least 1 year, got {}",
            period_years
        )));
    }
    check_period_bound(period_years)?;
    if horizon_years == 0 {
        return Ok(0.0);
    }

    let log_survival = f64::from(horizon_years) * (-1.0 / period_years).ln_1p();
    Ok((-log_survival.exp_m1()).clamp(0.0, 1.0))
}

/// Extreme-value strategy: scores a reading by where it falls on the fitted
/// distributions of historical rainfall and water level maxima.
#[derive(Debug, Clone)]
pub struct GumbelModel {
    rainfall: GumbelDistribution,
    water_level: GumbelDistribution,
}

impl GumbelModel {
    pub const NAME: &'static str = "gumbel";

    const RAINFALL_WEIGHT: f64 = 0.6;
    const WATER_WEIGHT: f64 = 0.4;

    pub fn new(rainfall: GumbelDistribution, water_level: GumbelDistribution) -> Self {
        Self {
            rainfall,
            water_level,
        }
    }

    pub fn from_maxima(
        rainfall_maxima: &[f64],
        water_level_maxima: &[f64],
    ) -> Result<Self, RiskModelError> {
        Ok(Self::new(
            GumbelDistribution::fit_moments(rainfall_maxima)?,
            GumbelDistribution::fit_moments(water_level_maxima)?,
        ))
    }

    pub fn rainfall(&self) -> &GumbelDistribution {
        &self.rainfall
    }

    pub fn water_level(&self) -> &GumbelDistribution {
        &self.water_level
    }
}

fn format_period(years: f64) -> String {
    if years.is_finite() && years < 1000.0 {
        format!("{:.1} tahun", years)
    } else {
        "> 1000 tahun".to_string()
    }
}

impl RiskModel for GumbelModel {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn raw_risk(&self, input: &RiskInput) -> f64 {
        Self::RAINFALL_WEIGHT * self.rainfall.cdf(input.rainfall_mm)
            + Self::WATER_WEIGHT * self.water_level.cdf(input.water_level)
    }

    fn detail(&self, input: &RiskInput) -> Option<String> {
        Some(format!(
            "Periode ulang curah hujan {}, tinggi muka air {}",
            format_period(self.rainfall.return_period(input.rainfall_mm)),
            format_period(self.water_level.return_period(input.water_level)),
        ))
    }
}
