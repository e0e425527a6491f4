//! Secondary durable log for reports and risk assessments.
//!
//! Mirroring is best-effort replication: implementations report success as a
//! bool and never return an error past this boundary.

mod http_report_mirror;
mod rows;

use async_trait::async_trait;

use crate::features::flood_reports::models::FloodReport;
use crate::features::risk::models::RiskAssessment;

pub use http_report_mirror::HttpReportMirror;
pub use rows::{assessment_row, report_row, ASSESSMENT_SHEET, REPORT_SHEET};

#[async_trait]
pub trait ReportMirror: Send + Sync {
    /// False for a mirror that never writes anywhere
    fn is_enabled(&self) -> bool {
        true
    }

    async fn append_report(&self, report: &FloodReport) -> bool;

    async fn append_assessments(&self, assessments: &[RiskAssessment]) -> bool;
}

/// Used when no mirror is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMirror;

#[async_trait]
impl ReportMirror for NoopMirror {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn append_report(&self, _report: &FloodReport) -> bool {
        false
    }

    async fn append_assessments(&self, _assessments: &[RiskAssessment]) -> bool {
        false
    }
}
