//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory by the estimator
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EstimateError;

/// Which half of an observation a value belongs to (used in error reporting).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Quantity,
    Price,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Quantity => f.write_str("quantity"),
            Field::Price => f.write_str("price"),
        }
    }
}

/// Check that `value` is usable in log-space: finite and strictly positive.
pub fn validate_positive(field: Field, value: f64) -> Result<f64, EstimateError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EstimateError::invalid(field, value))
    }
}

/// Parse a user-supplied number and validate it with [`validate_positive`].
pub fn parse_positive(field: Field, raw: &str) -> Result<f64, EstimateError> {
    let raw = raw.trim();
    let value = raw
        .parse::<f64>()
        .map_err(|_| EstimateError::invalid(field, raw))?;
    validate_positive(field, value)
}

/// One recorded (quantity, price) pair.
///
/// Both halves are finite and strictly positive. The fields are private so
/// every construction path (including deserialization) goes through
/// [`Observation::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ObservationRecord")]
pub struct Observation {
    quantity: f64,
    price: f64,
}

#[derive(Deserialize)]
struct ObservationRecord {
    quantity: f64,
    price: f64,
}

impl TryFrom<ObservationRecord> for Observation {
    type Error = EstimateError;

    fn try_from(record: ObservationRecord) -> Result<Self, Self::Error> {
        Observation::new(record.quantity, record.price)
    }
}

impl Observation {
    /// Build a validated observation.
    pub fn new(quantity: f64, price: f64) -> Result<Self, EstimateError> {
        Ok(Self {
            quantity: validate_positive(Field::Quantity, quantity)?,
            price: validate_positive(Field::Price, price)?,
        })
    }

    /// Parse both halves from text (e.g. a CSV cell or a typed command).
    pub fn parse(quantity: &str, price: &str) -> Result<Self, EstimateError> {
        Ok(Self {
            quantity: parse_positive(Field::Quantity, quantity)?,
            price: parse_positive(Field::Price, price)?,
        })
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

/// Power-law parameters for `P = k * Q^a` plus the log-space R².
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    /// Scale `k = e^b` where `b` is the log-log intercept.
    pub k: f64,
    /// Exponent `a` (the log-log slope).
    pub a: f64,
    /// Squared Pearson correlation of `(ln Q, ln P)`.
    pub r_squared: f64,
}

impl FittedModel {
    /// Evaluate `k * q^a`.
    pub fn predict(&self, quantity: f64) -> f64 {
        crate::models::power_law(self.k, self.a, quantity)
    }

    /// Human-readable model equation, e.g. `P = 10.00 * Q^-0.32`.
    pub fn equation(&self) -> String {
        format!("P = {:.2} * Q^{:.2}", self.k, self.a)
    }
}

/// Informal lifecycle state of an estimator, driven by the observation count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorState {
    /// No observations.
    Empty,
    /// Exactly one observation: displayable but not fittable.
    Ready,
    /// Two or more observations: `fit`/`estimate`/`curve_samples` may be attempted.
    Fittable,
}

impl EstimatorState {
    pub fn from_count(n: usize) -> Self {
        match n {
            0 => EstimatorState::Empty,
            1 => EstimatorState::Ready,
            _ => EstimatorState::Fittable,
        }
    }
}

/// Summary stats about a set of observations.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub n_points: usize,
    pub quantity_min: f64,
    pub quantity_max: f64,
    pub price_min: f64,
    pub price_max: f64,
}

impl DatasetStats {
    /// Compute stats, or `None` for an empty slice.
    pub fn from_observations(observations: &[Observation]) -> Option<Self> {
        if observations.is_empty() {
            return None;
        }
        let mut stats = DatasetStats {
            n_points: observations.len(),
            quantity_min: f64::INFINITY,
            quantity_max: f64::NEG_INFINITY,
            price_min: f64::INFINITY,
            price_max: f64::NEG_INFINITY,
        };
        for o in observations {
            stats.quantity_min = stats.quantity_min.min(o.quantity());
            stats.quantity_max = stats.quantity_max.max(o.quantity());
            stats.price_min = stats.price_min.min(o.price());
            stats.price_max = stats.price_max.max(o.price());
        }
        Some(stats)
    }
}

/// A per-observation fitted result (used for exports).
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationResidual {
    pub observation: Observation,
    /// Model price at the observed quantity.
    pub fitted: f64,
    /// `price - fitted`.
    pub residual: f64,
    /// `ln(price) - ln(fitted)`, the residual the regression actually minimizes.
    pub log_residual: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus env/defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub csv_path: PathBuf,
    /// Optional quantity to price after fitting.
    pub estimate_quantity: Option<f64>,
    /// Number of points sampled along the fitted curve for plots/exports.
    pub curve_points: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    /// Also report R² computed on raw prices (not the fitted log-space R²).
    pub price_space_r2: bool,

    pub export_results: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub n_observations: usize,
    pub model: FittedModel,
    /// Optional diagnostic: R² on raw prices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_space_r_squared: Option<f64>,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGrid {
    pub quantity: Vec<f64>,
    pub price: Vec<f64>,
}

impl CurveGrid {
    pub fn from_samples(samples: &[(f64, f64)]) -> Self {
        Self {
            quantity: samples.iter().map(|&(q, _)| q).collect(),
            price: samples.iter().map(|&(_, p)| p).collect(),
        }
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        self.quantity
            .iter()
            .zip(self.price.iter())
            .map(|(&q, &p)| (q, p))
            .collect()
    }
}
