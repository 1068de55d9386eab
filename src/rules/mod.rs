//! Rules module - custom rule store, pattern scanner and findings

pub mod results;
pub mod scanner;
pub mod store;

pub use results::Finding;
pub use scanner::{PatternError, PatternScanner};
pub use store::Rule;
