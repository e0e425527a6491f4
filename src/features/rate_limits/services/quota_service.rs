use std::sync::Arc;

use crate::core::clock::{day_window, Clock};
use crate::features::flood_reports::stores::{ReportStore, StorageError};
use crate::features::rate_limits::dtos::QuotaStatusDto;

/// Daily per-submitter report quota.
///
/// Counts are recomputed from the store on every check.
pub struct QuotaService {
    store: Arc<dyn ReportStore>,
    clock: Arc<dyn Clock>,
    daily_limit: i64,
}

impl QuotaService {
    pub fn new(store: Arc<dyn ReportStore>, clock: Arc<dyn Clock>, daily_limit: i64) -> Self {
        Self {
            store,
            clock,
            daily_limit,
        }
    }

    pub fn daily_limit(&self) -> i64 {
        self.daily_limit
    }

    /// Whether this submitter may create another report today
    pub async fn can_submit(&self, submitter_identity: &str) -> Result<bool, StorageError> {
        let used = self.store.count_today(submitter_identity).await?;
        Ok(used < self.daily_limit)
    }

    pub async fn status(&self, submitter_identity: &str) -> Result<QuotaStatusDto, StorageError> {
        let reports_used = self.store.count_today(submitter_identity).await?;
        let resets_at = day_window(self.clock.now()).end;

        Ok(QuotaStatusDto {
            reports_used,
            reports_remaining: (self.daily_limit - reports_used).max(0),
            max_reports: self.daily_limit,
            can_submit: reports_used < self.daily_limit,
            resets_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::features::flood_reports::models::{FloodDepth, NewFloodReport};
    use crate::features::flood_reports::stores::InMemoryReportStore;
    use chrono::Duration;

    async fn seed(store: &InMemoryReportStore, identity: &str, n: usize) {
        for i in 0..n {
            store
                .create(NewFloodReport {
                    address: format!("Jl. Seed {}", i),
                    severity: FloodDepth::Betis,
                    reporter_name: "Ani".to_string(),
                    reporter_contact: None,
                    photo_reference: None,
                    submitter_identity: identity.to_string(),
                })
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_status_counts_down() {
        let clock = FixedClock::at_wib(2025, 5, 20, 18, 30, 0).shared();
        let store = Arc::new(InMemoryReportStore::new(clock.clone()));
        seed(&store, "ip-1", 3).await;

        let quota = QuotaService::new(store, clock, 10);
        let status = quota.status("ip-1").await.unwrap();

        assert_eq!(status.reports_used, 3);
        assert_eq!(status.reports_remaining, 7);
        assert_eq!(status.max_reports, 10);
        assert!(status.can_submit);
        assert_eq!(status.resets_at.to_rfc3339(), "2025-05-21T00:00:00+07:00");
    }

    #[tokio::test]
    async fn test_limit_reached_and_reset_next_day() {
        let clock = FixedClock::at_wib(2025, 5, 20, 22, 0, 0).shared();
        let store = Arc::new(InMemoryReportStore::new(clock.clone()));
        seed(&store, "ip-1", 2).await;

        let quota = QuotaService::new(store, clock.clone(), 2);
        assert!(!quota.can_submit("ip-1").await.unwrap());
        assert!(quota.can_submit("ip-2").await.unwrap());
        assert_eq!(quota.status("ip-1").await.unwrap().reports_remaining, 0);

        clock.advance(Duration::hours(2));
        assert!(quota.can_submit("ip-1").await.unwrap());
    }
}
