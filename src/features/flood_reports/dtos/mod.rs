mod flood_report_dto;

pub use flood_report_dto::*;
