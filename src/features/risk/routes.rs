use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::risk::handlers;
use crate::features::risk::services::RiskService;

/// Create public risk routes
pub fn routes(risk_service: Arc<RiskService>) -> Router {
    Router::new()
        .route("/api/risk/evaluate", post(handlers::evaluate_risk))
        .route("/api/risk/return-levels", get(handlers::get_return_levels))
        .with_state(risk_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::core::config::RiskConfig;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server() -> TestServer {
        let clock = FixedClock::at_wib(2025, 1, 15, 10, 0, 0).shared();
        let service = RiskService::from_config(&RiskConfig::default(), clock).unwrap();
        TestServer::new(routes(Arc::new(service))).unwrap()
    }

    #[tokio::test]
    async fn test_evaluate_returns_both_models() {
        let server = server();

        let response = server
            .post("/api/risk/evaluate")
            .json(&json!({
                "location": "Bukit Duri",
                "rainfall_mm": 300.0,
                "water_level": 150.0,
                "humidity": 100.0,
                "temp_min": 20.0,
                "temp_max": 20.0
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["overall_status"], "TINGGI");
        assert_eq!(body["data"]["assessments"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"]["assessments"][0]["model_name"], "linear_fallback");
        assert_eq!(body["data"]["assessments"][0]["location"], "Bukit Duri");
    }

    #[tokio::test]
    async fn test_evaluate_rejects_out_of_range_humidity() {
        let server = server();

        let response = server
            .post("/api/risk/evaluate")
            .json(&json!({
                "rainfall_mm": 10.0,
                "water_level": 90.0,
                "humidity": 140.0,
                "temp_min": 24.0,
                "temp_max": 31.0
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["errors"][0].as_str().unwrap().contains("humidity"));
    }

    #[tokio::test]
    async fn test_return_levels_default_and_custom_periods() {
        let server = server();

        let body: Value = server.get("/api/risk/return-levels").await.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 6);

        let response = server
            .get("/api/risk/return-levels")
            .add_query_param("periods", "5,20")
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"][1]["period_years"], 20.0);

        server
            .get("/api/risk/return-levels")
            .add_query_param("periods", "1")
            .expect_failure()
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .get("/api/risk/return-levels")
            .add_query_param("periods", "3000000000")
            .expect_failure()
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
