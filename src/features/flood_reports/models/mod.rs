mod flood_report;
mod monthly_statistics;

pub(crate) use flood_report::FloodReportRow;
pub use flood_report::{FloodDepth, FloodReport, NewFloodReport, ReportStatus};
pub use monthly_statistics::{most_affected_address, most_common_severity, MonthlyStatistics};
