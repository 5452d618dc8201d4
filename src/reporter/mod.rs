//! Report module for decoded captures.
//!
//! Collects decode outcomes into numbered rows plus an unprocessed
//! tally, and renders them as a fixed-width table.

mod report;
mod table;

pub use report::{Report, ReportBuilder, ReportRow};
pub use table::{format_mac, PORT_PLACEHOLDER};
