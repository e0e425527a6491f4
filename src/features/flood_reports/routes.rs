use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::flood_reports::handlers;
use crate::features::flood_reports::services::{ReportService, SubmissionService};

/// Create public report routes
pub fn routes(
    submission_service: Arc<SubmissionService>,
    report_service: Arc<ReportService>,
) -> Router {
    let submit = Router::new()
        .route("/api/reports", post(handlers::submit_report))
        .with_state(submission_service);

    let read = Router::new()
        .route("/api/reports", get(handlers::list_reports))
        .route("/api/reports/severities", get(handlers::list_severities))
        .with_state(report_service);

    submit.merge(read)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::features::flood_reports::stores::{InMemoryReportStore, ReportStore};
    use crate::features::mirror::NoopMirror;
    use crate::features::photos::InlinePhotoStore;
    use crate::features::rate_limits::QuotaService;
    use crate::shared::test_helpers::with_forwarded_identity;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::Value;

    const FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

    fn server_with_limit(daily_limit: i64) -> (TestServer, Arc<InMemoryReportStore>) {
        let clock = FixedClock::at_wib(2025, 1, 15, 9, 0, 0).shared();
        let store = Arc::new(InMemoryReportStore::new(clock.clone()));
        let quota = Arc::new(QuotaService::new(store.clone(), clock, daily_limit));
        let submission = SubmissionService::new(
            store.clone(),
            quota,
            Some(Arc::new(InlinePhotoStore)),
            Arc::new(NoopMirror),
        );

        let router = with_forwarded_identity(routes(
            Arc::new(submission),
            Arc::new(ReportService::new(store.clone())),
        ));
        (TestServer::new(router).unwrap(), store)
    }

    fn form(address: &str, severity: &str, name: &str) -> MultipartForm {
        MultipartForm::new()
            .add_text("address", address)
            .add_text("severity", severity)
            .add_text("reporter_name", name)
    }

    #[tokio::test]
    async fn test_submit_and_list_report() {
        let (server, store) = server_with_limit(10);

        let response = server
            .post("/api/reports")
            .add_header(FORWARDED_FOR, HeaderValue::from_static("203.0.113.7, 10.0.0.1"))
            .multipart(form("Jl. Contoh No.1", "Setinggi lutut", "Budi"))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Laporan berhasil dikirim. Terima kasih!");
        assert_eq!(body["data"]["severity"], "lutut");
        assert_eq!(body["data"]["submitted_at"], "2025-01-15T09:00:00+07:00");
        assert!(body["data"].get("submitter_identity").is_none());

        assert_eq!(store.count_today("203.0.113.7").await.unwrap(), 1);

        let body: Value = server.get("/api/reports").await.json();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["address"], "Jl. Contoh No.1");
        assert_eq!(body["data"][0]["severity_label"], "Setinggi lutut");
    }

    #[tokio::test]
    async fn test_submit_with_photo() {
        let (server, _) = server_with_limit(10);

        let photo = Part::bytes(vec![0xFF, 0xFF, 0xFF])
            .file_name("banjir.GIF")
            .mime_type("image/gif");
        let response = server
            .post("/api/reports")
            .add_header(FORWARDED_FOR, HeaderValue::from_static("203.0.113.7"))
            .multipart(form("Jl. Contoh No.1", "betis", "Budi").add_part("photo", photo))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["photo_reference"], "data:image/gif;base64,////");
    }

    #[tokio::test]
    async fn test_submit_rejects_bad_photo_type() {
        let (server, store) = server_with_limit(10);

        let photo = Part::bytes(vec![1, 2, 3]).file_name("malware.exe");
        let response = server
            .post("/api/reports")
            .add_header(FORWARDED_FOR, HeaderValue::from_static("203.0.113.7"))
            .multipart(form("Jl. Contoh No.1", "betis", "Budi").add_part("photo", photo))
            .expect_failure()
            .await;

        response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_submit_validation_lists_every_field() {
        let (server, _) = server_with_limit(10);

        let response = server
            .post("/api/reports")
            .add_header(FORWARDED_FOR, HeaderValue::from_static("203.0.113.7"))
            .multipart(form("", "Pilih tinggi banjir", ""))
            .expect_failure()
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_submit_quota_exceeded() {
        let (server, store) = server_with_limit(1);

        server
            .post("/api/reports")
            .add_header(FORWARDED_FOR, HeaderValue::from_static("203.0.113.7"))
            .multipart(form("Jl. Satu", "betis", "Ani"))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/api/reports")
            .add_header(FORWARDED_FOR, HeaderValue::from_static("203.0.113.7"))
            .multipart(form("Jl. Dua", "betis", "Ani"))
            .expect_failure()
            .await;

        response.assert_status(StatusCode::TOO_MANY_REQUESTS);
        let body: Value = response.json();
        assert_eq!(
            body["message"],
            "Anda telah mencapai batas maksimal 1 laporan per hari."
        );
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_submit_without_identity_is_rejected() {
        let (server, _) = server_with_limit(10);

        server
            .post("/api/reports")
            .multipart(form("Jl. Satu", "betis", "Ani"))
            .expect_failure()
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_severities_in_order() {
        let (server, _) = server_with_limit(10);

        let body: Value = server.get("/api/reports/severities").await.json();
        let codes: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["mata_kaki", "betis", "lutut", "atas_lutut"]);
    }

    #[tokio::test]
    async fn test_list_window_query() {
        let (server, _) = server_with_limit(10);

        for window in ["today", "month", "all"] {
            server
                .get("/api/reports")
                .add_query_param("window", window)
                .await
                .assert_status_ok();
        }

        server
            .get("/api/reports")
            .add_query_param("window", "year")
            .expect_failure()
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
