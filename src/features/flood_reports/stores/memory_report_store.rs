use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::clock::{day_window, month_window, Clock, TimeWindow};
use crate::features::flood_reports::models::{
    FloodReport, MonthlyStatistics, NewFloodReport, ReportStatus,
};
use crate::features::flood_reports::stores::{sort_newest_first, ReportStore, StorageError};

#[derive(Default)]
struct Inner {
    reports: Vec<FloodReport>,
    last_id: i64,
}

/// Process-local report store. Used with `REPORT_STORE=memory` and in tests.
pub struct InMemoryReportStore {
    inner: RwLock<Inner>,
    clock: Arc<dyn Clock>,
}

impl InMemoryReportStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            clock,
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.reports.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn list_where(&self, window: Option<TimeWindow>) -> Vec<FloodReport> {
        let inner = self.inner.read().await;
        let mut reports: Vec<FloodReport> = inner
            .reports
            .iter()
            .filter(|r| window.is_none_or(|w| w.contains(&r.submitted_at)))
            .cloned()
            .collect();
        sort_newest_first(&mut reports);
        reports
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn create(&self, report: NewFloodReport) -> Result<FloodReport, StorageError> {
        let submitted_at = self.clock.now();
        let mut inner = self.inner.write().await;

        inner.last_id += 1;
        let created = FloodReport {
            id: inner.last_id,
            submitted_at,
            address: report.address,
            severity: report.severity,
            reporter_name: report.reporter_name,
            reporter_contact: report.reporter_contact,
            photo_reference: report.photo_reference,
            submitter_identity: report.submitter_identity,
            status: ReportStatus::Pending,
        };
        inner.reports.push(created.clone());

        tracing::debug!("Stored flood report {} in memory", created.id);
        Ok(created)
    }

    async fn count_today(&self, submitter_identity: &str) -> Result<i64, StorageError> {
        let window = day_window(self.clock.now());
        let inner = self.inner.read().await;

        let count = inner
            .reports
            .iter()
            .filter(|r| r.submitter_identity == submitter_identity)
            .filter(|r| window.contains(&r.submitted_at))
            .count();

        Ok(count as i64)
    }

    async fn list_today(&self) -> Result<Vec<FloodReport>, StorageError> {
        Ok(self.list_where(Some(day_window(self.clock.now()))).await)
    }

    async fn list_month(&self) -> Result<Vec<FloodReport>, StorageError> {
        Ok(self.list_where(Some(month_window(self.clock.now()))).await)
    }

    async fn list_all(&self) -> Result<Vec<FloodReport>, StorageError> {
        Ok(self.list_where(None).await)
    }

    async fn monthly_statistics(&self) -> Result<MonthlyStatistics, StorageError> {
        let now = self.clock.now();
        let reports = self.list_where(Some(month_window(now))).await;
        Ok(MonthlyStatistics::from_reports(&reports, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::features::flood_reports::models::FloodDepth;
    use chrono::Duration;

    fn new_report(address: &str, identity: &str) -> NewFloodReport {
        NewFloodReport {
            address: address.to_string(),
            severity: FloodDepth::Lutut,
            reporter_name: "Budi".to_string(),
            reporter_contact: None,
            photo_reference: None,
            submitter_identity: identity.to_string(),
        }
    }

    fn store_at(clock: &Arc<FixedClock>) -> InMemoryReportStore {
        InMemoryReportStore::new(clock.clone())
    }

    #[tokio::test]
    async fn test_create_assigns_clock_time_and_ids() {
        let clock = FixedClock::at_wib(2025, 2, 3, 9, 30, 0).shared();
        let store = store_at(&clock);

        let first = store.create(new_report("Jl. A", "ip-1")).await.unwrap();
        let second = store.create(new_report("Jl. B", "ip-1")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.submitted_at, clock.now());
        assert_eq!(first.status, ReportStatus::Pending);
    }

    #[tokio::test]
    async fn test_list_today_newest_first() {
        let clock = FixedClock::at_wib(2025, 2, 3, 9, 0, 0).shared();
        let store = store_at(&clock);

        store.create(new_report("T1", "ip-1")).await.unwrap();
        clock.advance(Duration::minutes(1));
        store.create(new_report("T2", "ip-1")).await.unwrap();
        clock.advance(Duration::minutes(1));
        store.create(new_report("T3", "ip-1")).await.unwrap();

        let addresses: Vec<String> = store
            .list_today()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.address)
            .collect();
        assert_eq!(addresses, vec!["T3", "T2", "T1"]);
    }

    #[tokio::test]
    async fn test_same_instant_ties_break_by_id() {
        let clock = FixedClock::at_wib(2025, 2, 3, 9, 0, 0).shared();
        let store = store_at(&clock);

        store.create(new_report("first", "ip-1")).await.unwrap();
        store.create(new_report("second", "ip-1")).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all[0].address, "second");
        assert_eq!(all[1].address, "first");
    }

    #[tokio::test]
    async fn test_count_today_respects_wib_midnight() {
        let clock = FixedClock::at_wib(2025, 2, 3, 23, 59, 59).shared();
        let store = store_at(&clock);

        store.create(new_report("late", "ip-1")).await.unwrap();
        assert_eq!(store.count_today("ip-1").await.unwrap(), 1);

        clock.advance(Duration::seconds(2));
        store.create(new_report("early", "ip-1")).await.unwrap();

        assert_eq!(store.count_today("ip-1").await.unwrap(), 1);
        assert_eq!(store.count_today("ip-2").await.unwrap(), 0);
        assert_eq!(store.list_today().await.unwrap()[0].address, "early");
    }

    #[tokio::test]
    async fn test_windows_filter_month_and_all() {
        let clock = FixedClock::at_wib(2025, 1, 31, 12, 0, 0).shared();
        let store = store_at(&clock);

        store.create(new_report("january", "ip-1")).await.unwrap();
        clock.advance(Duration::days(1));
        store.create(new_report("february", "ip-1")).await.unwrap();

        let month = store.list_month().await.unwrap();
        assert_eq!(month.len(), 1);
        assert_eq!(month[0].address, "february");
        assert_eq!(store.list_all().await.unwrap().len(), 2);
        assert!(store.list_today().await.unwrap().len() == 1);
    }

    #[tokio::test]
    async fn test_monthly_statistics_uses_month_window() {
        let clock = FixedClock::at_wib(2025, 2, 4, 8, 0, 0).shared();
        let store = store_at(&clock);

        store.create(new_report("Jl. Kenari", "ip-1")).await.unwrap();
        store.create(new_report("Jl. Kenari", "ip-2")).await.unwrap();
        store.create(new_report("Jl. Mawar", "ip-3")).await.unwrap();

        let stats = store.monthly_statistics().await.unwrap();
        assert_eq!(stats.month, "2025-02");
        assert_eq!(stats.total, 3);
        assert!((stats.average_per_day - 0.75).abs() < 1e-12);
        assert_eq!(stats.most_common_severity, Some(FloodDepth::Lutut));
        assert_eq!(stats.most_affected_address.as_deref(), Some("Jl. Kenari"));
    }
}
