mod memory_report_store;
mod pg_report_store;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::error::AppError;
use crate::features::flood_reports::models::{FloodReport, MonthlyStatistics, NewFloodReport};

pub use memory_report_store::InMemoryReportStore;
pub use pg_report_store::PgReportStore;

/// Primary store failure
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Report store unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// Durable record of flood reports.
///
/// Every listing is newest first: `submitted_at` descending, ties by `id`
/// descending. "Today" and "this month" are WIB windows taken from the
/// store's clock, and `create` stamps `submitted_at` from that same clock.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn create(&self, report: NewFloodReport) -> Result<FloodReport, StorageError>;

    /// Reports by this submitter within today's window
    async fn count_today(&self, submitter_identity: &str) -> Result<i64, StorageError>;

    async fn list_today(&self) -> Result<Vec<FloodReport>, StorageError>;

    async fn list_month(&self) -> Result<Vec<FloodReport>, StorageError>;

    async fn list_all(&self) -> Result<Vec<FloodReport>, StorageError>;

    async fn monthly_statistics(&self) -> Result<MonthlyStatistics, StorageError>;
}

/// Newest first, ties broken by id
pub(crate) fn sort_newest_first(reports: &mut [FloodReport]) {
    reports.sort_by(|a, b| {
        b.submitted_at
            .cmp(&a.submitted_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
