pub mod risk;

pub use risk::*;
