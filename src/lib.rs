//! Community flood reporting and early warning.
//!
//! Flood reports flow through [`features::flood_reports::SubmissionService`]
//! into a [`features::flood_reports::ReportStore`]; risk is scored by the
//! models in [`features::risk`]. The binary in `main.rs` serves both over HTTP.

pub mod core;
pub mod features;
pub mod modules;
pub mod shared;
