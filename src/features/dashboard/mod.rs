pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use clients::{FeedError, HttpReadingsSource, ReadingsSource};
pub use routes::routes;
pub use services::DashboardService;
