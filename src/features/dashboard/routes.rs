use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::dashboard::handlers;
use crate::features::dashboard::services::DashboardService;

/// Create public dashboard routes
pub fn routes(dashboard_service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/dashboard", get(handlers::get_dashboard))
        .with_state(dashboard_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::core::config::{FeedConfig, RiskConfig};
    use crate::features::dashboard::clients::{FeedError, Reading, ReadingsSource};
    use crate::features::mirror::NoopMirror;
    use crate::features::risk::RiskService;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;
    use std::time::Duration;

    struct OneReading;

    #[async_trait]
    impl ReadingsSource for OneReading {
        async fn fetch_current_readings(&self) -> Result<Vec<Reading>, FeedError> {
            Ok(vec![Reading {
                location: "Manggarai".to_string(),
                rainfall_mm: 300.0,
                water_level: 150.0,
                humidity: 100.0,
                temp_min: Some(20.0),
                temp_max: Some(20.0),
                source: Some("Pintu Air".to_string()),
                last_update: None,
            }])
        }
    }

    fn server(source: Option<Arc<dyn ReadingsSource>>) -> TestServer {
        let clock = FixedClock::at_wib(2025, 1, 15, 10, 0, 0).shared();
        let risk = RiskService::from_config(&RiskConfig::default(), clock.clone()).unwrap();
        let feed = FeedConfig {
            url: None,
            timeout: Duration::from_secs(1),
            default_temp_min: 24.0,
            default_temp_max: 32.0,
        };
        let service =
            DashboardService::new(source, Arc::new(risk), Arc::new(NoopMirror), clock, &feed);
        TestServer::new(routes(Arc::new(service))).unwrap()
    }

    #[tokio::test]
    async fn test_dashboard() {
        let server = server(Some(Arc::new(OneReading)));

        let response = server.get("/api/dashboard").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["overall_status"], "TINGGI");
        assert_eq!(body["data"]["locations"][0]["location"], "Manggarai");
        assert_eq!(body["data"]["locations"][0]["water_status"], "TINGGI");
        assert_eq!(
            body["data"]["locations"][0]["assessments"][0]["status"],
            "TINGGI"
        );
    }

    #[tokio::test]
    async fn test_dashboard_unavailable_without_feed() {
        let server = server(None);

        let response = server.get("/api/dashboard").expect_failure().await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = response.json();
        assert_eq!(body["message"], "Data prediksi tidak tersedia saat ini.");
    }
}
