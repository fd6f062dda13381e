//! Reporting utilities: tables, fit summaries and estimates as text.

pub mod format;

pub use format::*;
