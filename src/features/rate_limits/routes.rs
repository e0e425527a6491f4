use std::sync::Arc;

use axum::{routing::get, Router};

use super::handlers::get_quota_status;
use super::services::QuotaService;

/// Create public quota routes
pub fn routes(quota_service: Arc<QuotaService>) -> Router {
    Router::new()
        .route("/api/reports/quota", get(get_quota_status))
        .with_state(quota_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::features::flood_reports::models::{FloodDepth, NewFloodReport};
    use crate::features::flood_reports::stores::{InMemoryReportStore, ReportStore};
    use crate::shared::test_helpers::with_forwarded_identity;
    use axum::http::{HeaderName, HeaderValue};
    use axum_test::TestServer;
    use serde_json::Value;

    #[tokio::test]
    async fn test_quota_for_caller() {
        let clock = FixedClock::at_wib(2025, 1, 15, 21, 0, 0).shared();
        let store = Arc::new(InMemoryReportStore::new(clock.clone()));
        store
            .create(NewFloodReport {
                address: "Jl. Kenari".to_string(),
                severity: FloodDepth::MataKaki,
                reporter_name: "Yanto".to_string(),
                reporter_contact: None,
                photo_reference: None,
                submitter_identity: "198.51.100.4".to_string(),
            })
            .await
            .unwrap();

        let quota = Arc::new(QuotaService::new(store, clock, 10));
        let server = TestServer::new(with_forwarded_identity(routes(quota))).unwrap();

        let response = server
            .get("/api/reports/quota")
            .add_header(
                HeaderName::from_static("x-forwarded-for"),
                HeaderValue::from_static("198.51.100.4"),
            )
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["reports_used"], 1);
        assert_eq!(body["data"]["reports_remaining"], 9);
        assert_eq!(body["data"]["can_submit"], true);
        assert_eq!(body["data"]["resets_at"], "2025-01-16T00:00:00+07:00");
    }
}
