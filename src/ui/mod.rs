//! Terminal output for projstat.

mod report;

pub use report::ReportFormatter;
