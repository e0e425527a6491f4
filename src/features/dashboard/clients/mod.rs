mod http_readings_source;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::core::error::AppError;

pub use http_readings_source::HttpReadingsSource;

/// Realtime collaborator failure. The dashboard reports all of these as unavailable.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Readings feed is not configured")]
    NotConfigured,

    #[error("Readings feed timed out after {0:?}")]
    Timeout(Duration),

    #[error("Readings feed request failed: {0}")]
    Request(String),

    #[error("Readings feed returned malformed data: {0}")]
    Decode(String),

    #[error("Readings feed returned no usable readings")]
    NoReadings,
}

impl From<FeedError> for AppError {
    fn from(err: FeedError) -> Self {
        tracing::warn!("Dashboard unavailable: {}", err);
        AppError::ServiceUnavailable("Data prediksi tidak tersedia saat ini.".to_string())
    }
}

/// Current environmental reading for one monitored location
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reading {
    pub location: String,
    pub rainfall_mm: f64,
    pub water_level: f64,
    pub humidity: f64,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub temp_max: Option<f64>,
    /// Monitoring station or provider name
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub last_update: Option<DateTime<FixedOffset>>,
}

#[async_trait]
pub trait ReadingsSource: Send + Sync {
    async fn fetch_current_readings(&self) -> Result<Vec<Reading>, FeedError>;
}
