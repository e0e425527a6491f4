use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use utoipa::ToSchema;

/// Caller's daily submission quota
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuotaStatusDto {
    /// Reports submitted today (WIB)
    pub reports_used: i64,
    pub reports_remaining: i64,
    pub max_reports: i64,
    pub can_submit: bool,
    /// Next 00:00 WIB
    #[schema(value_type = String, format = DateTime)]
    pub resets_at: DateTime<FixedOffset>,
}
