pub mod base;
pub mod csv_processor;

pub use base::*;
pub use csv_processor::*;
