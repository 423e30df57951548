//! Terminal output formatting for llmcost
//!
//! This crate provides table and JSON output formatters and the
//! horizontal bar chart used by the chart view.

pub mod chart;
pub mod output;

pub use chart::BarChart;
pub use output::{JsonFormatter, OutputFormatter, Report, TableFormatter, get_formatter};
