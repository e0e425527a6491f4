pub mod dashboard;
pub mod flood_reports;
pub mod mirror;
pub mod photos;
pub mod rate_limits;
pub mod risk;
pub mod statistics;
