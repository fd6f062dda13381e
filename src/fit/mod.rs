//! Curve fitting.
//!
//! Responsibilities:
//!
//! - log-transform observations and fit the power law
//! - price-space diagnostics and per-observation residuals

pub mod fitter;

pub use fitter::*;
