use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::core::clock::{month_label, wib};
use crate::features::flood_reports::dtos::ReportWindow;
use crate::features::flood_reports::models::{
    most_affected_address, most_common_severity, FloodDepth, FloodReport, MonthlyStatistics,
};
use crate::features::flood_reports::services::ReportService;
use crate::features::flood_reports::stores::{ReportStore, StorageError};
use crate::features::statistics::dtos::*;

/// Read-side aggregates over stored reports. Everything is recomputed per call.
pub struct AggregationService {
    store: Arc<dyn ReportStore>,
    reports: ReportService,
}

impl AggregationService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self {
            reports: ReportService::new(Arc::clone(&store)),
            store,
        }
    }

    pub async fn monthly_statistics(&self) -> Result<MonthlyStatistics, StorageError> {
        self.store.monthly_statistics().await
    }

    pub async fn summary(
        &self,
        window: ReportWindow,
    ) -> Result<StatisticsSummaryDto, StorageError> {
        let reports = self.reports.list(window).await?;
        Ok(summarize(window, &reports))
    }

    /// Reports per submitter in the window, busiest first
    pub async fn counts_by_submitter(
        &self,
        window: ReportWindow,
    ) -> Result<Vec<(String, i64)>, StorageError> {
        let reports = self.reports.list(window).await?;
        Ok(count_by_submitter(&reports))
    }
}

pub fn summarize(window: ReportWindow, reports: &[FloodReport]) -> StatisticsSummaryDto {
    let unique_submitters = reports
        .iter()
        .map(|r| r.submitter_identity.as_str())
        .collect::<HashSet<_>>()
        .len() as i64;

    StatisticsSummaryDto {
        window,
        total: reports.len() as i64,
        by_day: count_by_day(reports),
        by_month: count_by_month(reports),
        by_severity: count_by_severity(reports),
        most_common_severity: most_common_severity(reports),
        most_affected_address: most_affected_address(reports),
        unique_submitters,
    }
}

/// Group by WIB calendar day, oldest first
pub fn count_by_day(reports: &[FloodReport]) -> Vec<DailyCountDto> {
    let mut days: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for report in reports {
        *days
            .entry(report.submitted_at.with_timezone(&wib()).date_naive())
            .or_default() += 1;
    }

    days.into_iter()
        .map(|(date, count)| DailyCountDto { date, count })
        .collect()
}

/// Group by WIB calendar month, oldest first
pub fn count_by_month(reports: &[FloodReport]) -> Vec<MonthlyCountDto> {
    let mut months: BTreeMap<String, i64> = BTreeMap::new();
    for report in reports {
        *months.entry(month_label(report.submitted_at)).or_default() += 1;
    }

    months
        .into_iter()
        .map(|(month, count)| MonthlyCountDto { month, count })
        .collect()
}

pub fn count_by_severity(reports: &[FloodReport]) -> Vec<SeverityCountDto> {
    FloodDepth::ALL
        .into_iter()
        .map(|severity| SeverityCountDto {
            severity,
            label: severity.label().to_string(),
            count: reports.iter().filter(|r| r.severity == severity).count() as i64,
        })
        .collect()
}

/// Busiest submitter first, ties by identity
pub fn count_by_submitter(reports: &[FloodReport]) -> Vec<(String, i64)> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for report in reports {
        *counts.entry(report.submitter_identity.as_str()).or_default() += 1;
    }

    let mut counts: Vec<(String, i64)> = counts
        .into_iter()
        .map(|(identity, count)| (identity.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}
