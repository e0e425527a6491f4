use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::statistics::handlers;
use crate::features::statistics::services::AggregationService;

/// Create public statistics routes
pub fn routes(aggregation_service: Arc<AggregationService>) -> Router {
    Router::new()
        .route("/api/statistics/monthly", get(handlers::get_monthly_statistics))
        .route("/api/statistics/summary", get(handlers::get_summary))
        .with_state(aggregation_service)
}
