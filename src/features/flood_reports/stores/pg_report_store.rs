use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::core::clock::{day_window, month_window, Clock};
use crate::features::flood_reports::models::{
    FloodDepth, FloodReport, FloodReportRow, MonthlyStatistics, NewFloodReport,
};
use crate::features::flood_reports::stores::{ReportStore, StorageError};

const REPORT_COLUMNS: &str = r#"
    id, submitted_at, address, severity, reporter_name, reporter_contact,
    photo_reference, submitter_identity, status
"#;

/// Postgres-backed report store
pub struct PgReportStore {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl PgReportStore {
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    async fn list_between(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<FloodReport>, StorageError> {
        let sql = format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM flood_reports
            WHERE ($1::timestamptz IS NULL OR submitted_at >= $1)
              AND ($2::timestamptz IS NULL OR submitted_at < $2)
            ORDER BY submitted_at DESC, id DESC
            "#
        );

        let rows = sqlx::query_as::<_, FloodReportRow>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list flood reports: {:?}", e);
                StorageError::Database(e)
            })?;

        Ok(rows.into_iter().map(FloodReport::from).collect())
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn create(&self, report: NewFloodReport) -> Result<FloodReport, StorageError> {
        let submitted_at = self.clock.now().with_timezone(&Utc);

        let sql = format!(
            r#"
            INSERT INTO flood_reports (
                submitted_at, address, severity, reporter_name,
                reporter_contact, photo_reference, submitter_identity
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {REPORT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, FloodReportRow>(&sql)
            .bind(submitted_at)
            .bind(&report.address)
            .bind(report.severity)
            .bind(&report.reporter_name)
            .bind(&report.reporter_contact)
            .bind(&report.photo_reference)
            .bind(&report.submitter_identity)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create flood report: {:?}", e);
                StorageError::Database(e)
            })?;

        tracing::info!("Created flood report: {}", row.id);

        Ok(row.into())
    }

    async fn count_today(&self, submitter_identity: &str) -> Result<i64, StorageError> {
        let window = day_window(self.clock.now());

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM flood_reports
            WHERE submitter_identity = $1
              AND submitted_at >= $2
              AND submitted_at < $3
            "#,
        )
        .bind(submitter_identity)
        .bind(window.start_utc())
        .bind(window.end_utc())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count submitter reports today: {:?}", e);
            StorageError::Database(e)
        })?;

        Ok(count)
    }

    async fn list_today(&self) -> Result<Vec<FloodReport>, StorageError> {
        let window = day_window(self.clock.now());
        self.list_between(Some(window.start_utc()), Some(window.end_utc()))
            .await
    }

    async fn list_month(&self) -> Result<Vec<FloodReport>, StorageError> {
        let window = month_window(self.clock.now());
        self.list_between(Some(window.start_utc()), Some(window.end_utc()))
            .await
    }

    async fn list_all(&self) -> Result<Vec<FloodReport>, StorageError> {
        self.list_between(None, None).await
    }

    async fn monthly_statistics(&self) -> Result<MonthlyStatistics, StorageError> {
        let now = self.clock.now();
        let window = month_window(now);

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM flood_reports
            WHERE submitted_at >= $1 AND submitted_at < $2
            "#,
        )
        .bind(window.start_utc())
        .bind(window.end_utc())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count monthly reports: {:?}", e);
            StorageError::Database(e)
        })?;

        // Enum order is severity order, so DESC breaks ties toward the deeper bucket
        let most_common_severity: Option<FloodDepth> = sqlx::query_scalar(
            r#"
            SELECT severity
            FROM flood_reports
            WHERE submitted_at >= $1 AND submitted_at < $2
            GROUP BY severity
            ORDER BY COUNT(*) DESC, severity DESC
            LIMIT 1
            "#,
        )
        .bind(window.start_utc())
        .bind(window.end_utc())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute most common severity: {:?}", e);
            StorageError::Database(e)
        })?;

        // Ties go to the address whose latest report (by submitted_at, then id) is newest
        let most_affected_address: Option<String> = sqlx::query_scalar(
            r#"
            SELECT address
            FROM (
                SELECT
                    address,
                    submitted_at,
                    id,
                    COUNT(*) OVER (PARTITION BY address) AS reports,
                    ROW_NUMBER() OVER (
                        PARTITION BY address ORDER BY submitted_at DESC, id DESC
                    ) AS recency
                FROM flood_reports
                WHERE submitted_at >= $1 AND submitted_at < $2
            ) ranked
            WHERE recency = 1
            ORDER BY reports DESC, submitted_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(window.start_utc())
        .bind(window.end_utc())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute most affected address: {:?}", e);
            StorageError::Database(e)
        })?;

        Ok(MonthlyStatistics::from_parts(
            now,
            total,
            most_common_severity,
            most_affected_address,
        ))
    }
}

/// Parity with `InMemoryReportStore`. Needs a Postgres reachable through
/// `DATABASE_URL`; run with `cargo test -- --ignored`.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::features::flood_reports::stores::InMemoryReportStore;
    use chrono::Duration;

    struct Pair {
        clock: Arc<FixedClock>,
        pg: PgReportStore,
        memory: InMemoryReportStore,
    }

    impl Pair {
        fn new(pool: PgPool) -> Self {
            let clock = FixedClock::at_wib(2024, 12, 31, 23, 30, 0).shared();
            Self {
                pg: PgReportStore::new(pool, clock.clone()),
                memory: InMemoryReportStore::new(clock.clone()),
                clock,
            }
        }

        async fn create_in_both(&self, address: &str, severity: FloodDepth, identity: &str) {
            let report = NewFloodReport {
                address: address.to_string(),
                severity,
                reporter_name: "Siti".to_string(),
                reporter_contact: None,
                photo_reference: None,
                submitter_identity: identity.to_string(),
            };
            let pg = self.pg.create(report.clone()).await.unwrap();
            let memory = self.memory.create(report).await.unwrap();
            assert_eq!(pg.id, memory.id);
            assert_eq!(pg.submitted_at, memory.submitted_at);
        }

        /// December report, then four January reports whose clock steps back
        /// so the latest-by-time and highest-id rows of an address differ
        async fn seed(&self) {
            self.create_in_both("Jl. Lama", FloodDepth::AtasLutut, "a").await;

            // 2025-01-20 10:00 WIB
            self.clock.advance(Duration::days(19) + Duration::minutes(630));
            self.create_in_both("Jl. Kenari", FloodDepth::Betis, "a").await;
            self.create_in_both("Jl. Melati", FloodDepth::Lutut, "b").await;
            self.clock.advance(Duration::minutes(-7));
            self.create_in_both("Jl. Melati", FloodDepth::Lutut, "b").await;
            self.clock.advance(Duration::minutes(2));
            self.create_in_both("Jl. Kenari", FloodDepth::Betis, "a").await;
        }
    }

    fn ids(reports: &[FloodReport]) -> Vec<i64> {
        reports.iter().map(|r| r.id).collect()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_listing_matches_memory_store(pool: PgPool) {
        let stores = Pair::new(pool);
        stores.seed().await;

        let all = stores.pg.list_all().await.unwrap();
        assert_eq!(ids(&all), vec![3, 2, 5, 4, 1]);
        assert_eq!(ids(&all), ids(&stores.memory.list_all().await.unwrap()));

        let month = stores.pg.list_month().await.unwrap();
        assert_eq!(ids(&month), vec![3, 2, 5, 4]);
        assert_eq!(ids(&month), ids(&stores.memory.list_month().await.unwrap()));

        assert_eq!(
            ids(&stores.pg.list_today().await.unwrap()),
            ids(&stores.memory.list_today().await.unwrap())
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_count_today_follows_wib_days(pool: PgPool) {
        let stores = Pair::new(pool);
        stores.create_in_both("Jl. Lama", FloodDepth::Betis, "a").await;
        assert_eq!(stores.pg.count_today("a").await.unwrap(), 1);

        // 2025-01-01 00:00 WIB
        stores.clock.advance(Duration::minutes(30));
        assert_eq!(stores.pg.count_today("a").await.unwrap(), 0);
        assert_eq!(stores.memory.count_today("a").await.unwrap(), 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_monthly_statistics_tie_breaks_match_memory_store(pool: PgPool) {
        let stores = Pair::new(pool);
        stores.seed().await;

        let pg = stores.pg.monthly_statistics().await.unwrap();
        let memory = stores.memory.monthly_statistics().await.unwrap();

        assert_eq!(pg, memory);
        assert_eq!(pg.total, 4);
        // Two each; the deeper depth wins
        assert_eq!(pg.most_common_severity, Some(FloodDepth::Lutut));
        // Both latest reports sit at 10:00; Jl. Melati's has the higher id
        assert_eq!(pg.most_affected_address.as_deref(), Some("Jl. Melati"));
    }
}
