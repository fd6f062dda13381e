//! Log-log fitting of a power law.
//!
//! Given observations `(q_i, p_i)` we:
//! - transform to `x_i = ln q_i`, `y_i = ln p_i`
//! - regress `y` on `x` (closed-form OLS) to get slope `a` and intercept `b`
//! - recover `k = e^b`
//!
//! The reported R² is the log-space one (squared correlation of `x` and `y`).
//! [`price_space_r_squared`] is a separate diagnostic on raw prices.

use tracing::debug;

use crate::domain::{FittedModel, Observation, ObservationResidual};
use crate::error::EstimateError;
use crate::math::simple_linear_regression;

/// Minimum number of observations required for a fit.
pub const MIN_FIT_POINTS: usize = 2;

/// Fit `P = k * Q^a` to the observations.
///
/// Errors:
/// - `InsufficientData` with fewer than [`MIN_FIT_POINTS`] observations
/// - `DegenerateFit` when every quantity is the same, or when the slope is so
///   steep that `k = e^b` underflows to zero or overflows
pub fn fit_power_law(observations: &[Observation]) -> Result<FittedModel, EstimateError> {
    if observations.len() < MIN_FIT_POINTS {
        return Err(EstimateError::InsufficientData {
            have: observations.len(),
        });
    }

    let ln_q: Vec<f64> = observations.iter().map(|o| o.quantity().ln()).collect();
    let ln_p: Vec<f64> = observations.iter().map(|o| o.price().ln()).collect();

    let line = simple_linear_regression(&ln_q, &ln_p).ok_or(EstimateError::DegenerateFit)?;

    let model = FittedModel {
        k: line.intercept.exp(),
        a: line.slope,
        r_squared: line.r_squared,
    };
    if !(model.k.is_finite() && model.k > 0.0 && model.a.is_finite()) {
        debug!(
            n = observations.len(),
            slope = line.slope,
            intercept = line.intercept,
            "power law not representable"
        );
        return Err(EstimateError::DegenerateFit);
    }
    debug!(
        n = observations.len(),
        k = model.k,
        a = model.a,
        r_squared = model.r_squared,
        "fitted power law"
    );
    Ok(model)
}

/// R² of the fitted curve measured on raw prices: `1 - SS_res / SS_tot`.
///
/// Unlike the log-space R² this can be negative for a poor fit. Returns `None`
/// when fewer than two observations are given or every price is identical.
pub fn price_space_r_squared(model: &FittedModel, observations: &[Observation]) -> Option<f64> {
    if observations.len() < MIN_FIT_POINTS {
        return None;
    }
    let n = observations.len() as f64;
    let mean = observations.iter().map(|o| o.price()).sum::<f64>() / n;

    let mut ss_tot = 0.0;
    let mut ss_res = 0.0;
    for o in observations {
        ss_tot += (o.price() - mean).powi(2);
        ss_res += (o.price() - model.predict(o.quantity())).powi(2);
    }
    if ss_tot == 0.0 || !ss_tot.is_finite() {
        return None;
    }
    Some(1.0 - ss_res / ss_tot).filter(|r2| r2.is_finite())
}

/// Compute fitted prices and residuals for each observation.
pub fn compute_residuals(model: &FittedModel, observations: &[Observation]) -> Vec<ObservationResidual> {
    observations
        .iter()
        .map(|&o| {
            let fitted = model.predict(o.quantity());
            ObservationResidual {
                observation: o,
                fitted,
                residual: o.price() - fitted,
                log_residual: o.price().ln() - fitted.ln(),
            }
        })
        .collect()
}
