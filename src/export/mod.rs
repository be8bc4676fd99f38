pub mod csv;
pub mod json;
pub mod report;

pub use csv::*;
pub use json::*;
pub use report::*;
