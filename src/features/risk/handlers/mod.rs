pub mod risk_handler;

pub use risk_handler::*;
