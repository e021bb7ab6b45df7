//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod types;


pub use cli::BenchArgs;
pub use parsers::{parse_duration_arg, parse_endpoint};
pub use types::ReportFormat;
