pub mod form;
pub mod help;
pub mod results;

pub use form::*;
pub use help::*;
pub use results::*;
