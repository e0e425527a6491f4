use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::core::config::MirrorConfig;
use crate::features::flood_reports::models::FloodReport;
use crate::features::mirror::{
    assessment_row, report_row, ReportMirror, ASSESSMENT_SHEET, REPORT_SHEET,
};
use crate::features::risk::models::RiskAssessment;
use crate::shared::retry::with_retry;

#[derive(Debug, Serialize)]
struct AppendRowsRequest<'a> {
    sheet: &'a str,
    rows: Vec<Vec<Value>>,
}

/// Appends rows to a spreadsheet through an HTTP webhook.
///
/// Each append is bounded by `timeout` per attempt and retried `retries` times.
pub struct HttpReportMirror {
    http_client: reqwest::Client,
    url: String,
    token: Option<String>,
    timeout: Duration,
    retries: u32,
}

impl HttpReportMirror {
    pub fn new(url: String, token: Option<String>, timeout: Duration, retries: u32) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            url,
            token,
            timeout,
            retries,
        }
    }

    /// `None` when mirroring is not configured
    pub fn from_config(config: &MirrorConfig) -> Option<Self> {
        config.url.as_ref().map(|url| {
            Self::new(
                url.clone(),
                config.token.clone(),
                config.timeout,
                config.retries,
            )
        })
    }

    async fn post_rows(&self, request: &AppendRowsRequest<'_>) -> Result<(), String> {
        let mut builder = self.http_client.post(&self.url).json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("HTTP {} - {}", status, body));
        }

        Ok(())
    }

    async fn append(&self, sheet: &str, rows: Vec<Vec<Value>>) -> bool {
        let request = AppendRowsRequest { sheet, rows };
        let label = format!("mirror append to {}", sheet);

        match with_retry(&label, self.retries, self.timeout, || self.post_rows(&request)).await {
            Ok(()) => {
                tracing::debug!("Mirrored {} row(s) to {}", request.rows.len(), sheet);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to mirror rows to {}: {}", sheet, e);
                false
            }
        }
    }
}

#[async_trait]
impl ReportMirror for HttpReportMirror {
    async fn append_report(&self, report: &FloodReport) -> bool {
        self.append(REPORT_SHEET, vec![report_row(report)]).await
    }

    async fn append_assessments(&self, assessments: &[RiskAssessment]) -> bool {
        if assessments.is_empty() {
            return true;
        }
        let rows = assessments.iter().map(assessment_row).collect();
        self.append(ASSESSMENT_SHEET, rows).await
    }
}
