use std::collections::HashMap;

use chrono::{DateTime, Datelike, FixedOffset};
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::clock::{month_label, wib};
use crate::features::flood_reports::models::{FloodDepth, FloodReport};

/// Aggregate over the current WIB month, recomputed on every call
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlyStatistics {
    /// `YYYY-MM`
    pub month: String,
    pub total: i64,
    /// Total divided by the days elapsed this month, today included
    pub average_per_day: f64,
    pub most_common_severity: Option<FloodDepth>,
    pub most_affected_address: Option<String>,
}

impl MonthlyStatistics {
    /// Build from the month's reports as of `now`
    pub fn from_reports(reports: &[FloodReport], now: DateTime<FixedOffset>) -> Self {
        Self::from_parts(
            now,
            reports.len() as i64,
            most_common_severity(reports),
            most_affected_address(reports),
        )
    }

    pub fn from_parts(
        now: DateTime<FixedOffset>,
        total: i64,
        most_common_severity: Option<FloodDepth>,
        most_affected_address: Option<String>,
    ) -> Self {
        let days_elapsed = now.with_timezone(&wib()).day() as f64;

        Self {
            month: month_label(now),
            total,
            average_per_day: total as f64 / days_elapsed,
            most_common_severity,
            most_affected_address,
        }
    }
}

/// Most frequent depth; ties go to the more severe depth
pub fn most_common_severity(reports: &[FloodReport]) -> Option<FloodDepth> {
    let mut counts: HashMap<FloodDepth, usize> = HashMap::new();
    for report in reports {
        *counts.entry(report.severity).or_default() += 1;
    }

    counts
        .into_iter()
        .max_by_key(|(depth, count)| (*count, *depth))
        .map(|(depth, _)| depth)
}

/// Most frequently reported address; ties go to the most recently reported one
pub fn most_affected_address(reports: &[FloodReport]) -> Option<String> {
    let mut counts: HashMap<&str, (usize, (DateTime<FixedOffset>, i64))> = HashMap::new();
    for report in reports {
        let latest = (report.submitted_at, report.id);
        let entry = counts.entry(report.address.as_str()).or_insert((0, latest));
        entry.0 += 1;
        if latest > entry.1 {
            entry.1 = latest;
        }
    }

    counts
        .into_iter()
        .max_by_key(|(_, (count, latest))| (*count, *latest))
        .map(|(address, _)| address.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::{Clock, FixedClock};
    use crate::features::flood_reports::models::ReportStatus;
    use chrono::Duration;

    fn report(id: i64, minutes: i64, address: &str, severity: FloodDepth) -> FloodReport {
        let base = FixedClock::at_wib(2025, 3, 10, 8, 0, 0).now();
        FloodReport {
            id,
            submitted_at: base + Duration::minutes(minutes),
            address: address.to_string(),
            severity,
            reporter_name: "Siti".to_string(),
            reporter_contact: None,
            photo_reference: None,
            submitter_identity: "10.0.0.1".to_string(),
            status: ReportStatus::Pending,
        }
    }

    #[test]
    fn test_monthly_statistics() {
        let reports = vec![
            report(1, 0, "Jl. Kenari", FloodDepth::Betis),
            report(2, 5, "Jl. Kenari", FloodDepth::Lutut),
            report(3, 10, "Jl. Melati", FloodDepth::Betis),
        ];
        let now = FixedClock::at_wib(2025, 3, 10, 12, 0, 0).now();

        let stats = MonthlyStatistics::from_reports(&reports, now);

        assert_eq!(stats.month, "2025-03");
        assert_eq!(stats.total, 3);
        assert!((stats.average_per_day - 0.3).abs() < 1e-12);
        assert_eq!(stats.most_common_severity, Some(FloodDepth::Betis));
        assert_eq!(stats.most_affected_address.as_deref(), Some("Jl. Kenari"));
    }

    #[test]
    fn test_empty_month() {
        let now = FixedClock::at_wib(2025, 3, 1, 0, 0, 0).now();
        let stats = MonthlyStatistics::from_reports(&[], now);

        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_per_day, 0.0);
        assert_eq!(stats.most_common_severity, None);
        assert_eq!(stats.most_affected_address, None);
    }

    #[test]
    fn test_ties_prefer_severe_depth_and_recent_address() {
        let reports = vec![
            report(1, 0, "Jl. Kenari", FloodDepth::MataKaki),
            report(2, 30, "Jl. Melati", FloodDepth::AtasLutut),
        ];

        assert_eq!(most_common_severity(&reports), Some(FloodDepth::AtasLutut));
        assert_eq!(most_affected_address(&reports).as_deref(), Some("Jl. Melati"));
    }
}
