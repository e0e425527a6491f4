mod report_service;
mod submission_service;

pub use report_service::ReportService;
pub use submission_service::{
    MirrorOutcome, SubmissionError, SubmissionOutcome, SubmissionService, SubmitReport,
};
