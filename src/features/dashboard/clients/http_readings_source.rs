use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::core::config::FeedConfig;
use crate::features::dashboard::clients::{FeedError, Reading, ReadingsSource};

/// The feed may return a bare list or wrap it
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReadingsPayload {
    List(Vec<Reading>),
    Wrapped { readings: Vec<Reading> },
}

impl From<ReadingsPayload> for Vec<Reading> {
    fn from(payload: ReadingsPayload) -> Self {
        match payload {
            ReadingsPayload::List(readings) => readings,
            ReadingsPayload::Wrapped { readings } => readings,
        }
    }
}

/// Pulls readings from a JSON endpoint, bounded by `timeout`
pub struct HttpReadingsSource {
    http_client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpReadingsSource {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            url,
            timeout,
        }
    }

    /// `None` when no feed URL is configured
    pub fn from_config(config: &FeedConfig) -> Option<Self> {
        config
            .url
            .as_ref()
            .map(|url| Self::new(url.clone(), config.timeout))
    }

    fn parse(body: &str) -> Result<Vec<Reading>, FeedError> {
        serde_json::from_str::<ReadingsPayload>(body)
            .map(Vec::from)
            .map_err(|e| FeedError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ReadingsSource for HttpReadingsSource {
    async fn fetch_current_readings(&self) -> Result<Vec<Reading>, FeedError> {
        let response = self
            .http_client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FeedError::Timeout(self.timeout)
                } else {
                    FeedError::Request(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(FeedError::Request(format!("HTTP {}", response.status())));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FeedError::Timeout(self.timeout)
            } else {
                FeedError::Request(e.to_string())
            }
        })?;

        let readings = Self::parse(&body)?;
        tracing::debug!("Fetched {} reading(s) from {}", readings.len(), self.url);
        Ok(readings)
    }
}
