//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - validated observations (`Observation`) and value checks
//! - fit outputs (`FittedModel`, `ObservationResidual`)
//! - run configuration and the curve JSON schema (`RunConfig`, `CurveFile`)

pub mod types;

pub use types::*;
