use serde_json::{json, Value};

use crate::features::flood_reports::models::FloodReport;
use crate::features::risk::models::RiskAssessment;

pub const REPORT_SHEET: &str = "flood_reports";
pub const ASSESSMENT_SHEET: &str = "predictions";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `timestamp, address, flood_height, reporter_name, reporter_phone, submitter, photo_url, status`
pub fn report_row(report: &FloodReport) -> Vec<Value> {
    // Inline data URIs are too large for a spreadsheet cell
    let photo_url = report
        .photo_reference
        .as_deref()
        .filter(|r| !r.starts_with("data:"))
        .unwrap_or_default();

    vec![
        json!(report.submitted_at.format(TIMESTAMP_FORMAT).to_string()),
        json!(report.address),
        json!(report.severity.label()),
        json!(report.reporter_name),
        json!(report.reporter_contact.as_deref().unwrap_or_default()),
        json!(report.submitter_identity),
        json!(photo_url),
        json!(report.status.to_string()),
    ]
}

/// `timestamp, location, rainfall, water_level, humidity, temp_min, temp_max, risk_level, status, message, model`
pub fn assessment_row(assessment: &RiskAssessment) -> Vec<Value> {
    vec![
        json!(assessment.timestamp.format(TIMESTAMP_FORMAT).to_string()),
        json!(assessment.location),
        json!(assessment.rainfall_mm),
        json!(assessment.water_level),
        json!(assessment.humidity_pct),
        json!(assessment.temp_min),
        json!(assessment.temp_max),
        json!(assessment.risk_level),
        json!(assessment.status.label()),
        json!(assessment.message),
        json!(assessment.model_name),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::{Clock, FixedClock};
    use crate::features::flood_reports::models::{FloodDepth, ReportStatus};

    #[test]
    fn test_report_row_layout() {
        let report = FloodReport {
            id: 7,
            submitted_at: FixedClock::at_wib(2025, 1, 15, 14, 5, 9).now(),
            address: "Jl. Contoh No.1".to_string(),
            severity: FloodDepth::Lutut,
            reporter_name: "Budi".to_string(),
            reporter_contact: None,
            photo_reference: Some("data:image/png;base64,AAAA".to_string()),
            submitter_identity: "203.0.113.9".to_string(),
            status: ReportStatus::Pending,
        };

        let row = report_row(&report);

        assert_eq!(
            row,
            vec![
                json!("2025-01-15 14:05:09"),
                json!("Jl. Contoh No.1"),
                json!("Setinggi lutut"),
                json!("Budi"),
                json!(""),
                json!("203.0.113.9"),
                json!(""),
                json!("pending"),
            ]
        );
    }
}
