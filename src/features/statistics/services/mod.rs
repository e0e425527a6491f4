mod aggregation_service;

pub use aggregation_service::{
    count_by_day, count_by_month, count_by_severity, count_by_submitter, summarize,
    AggregationService,
};
