//! `pricer` library crate.
//!
//! Estimates prices for a requested quantity from historical
//! `(quantity, price)` observations, assuming a power law `P = k * Q^a`
//! fitted by least squares in log-log space.
//!
//! The binary (`pricer`) is a thin wrapper around this library so that:
//!
//! - the estimator is testable without spawning processes
//! - front-ends (CLI, interactive session) stay thin callers of `estimator`

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod estimator;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;

pub use domain::{FittedModel, Observation};
pub use error::EstimateError;
pub use estimator::PowerLawEstimator;
